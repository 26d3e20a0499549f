use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use qbank::api::{HttpApi, QuestionBankApi};
use qbank::app::App;
use qbank::config::Config;
use qbank::worker::{spawn_api_worker, CHANNEL_CAPACITY};
use qbank::{logger, ui};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::error::Error;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const TICK_RATE: Duration = Duration::from_millis(250);

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    logger::init(&config.log_path());
    logger::log(&format!("Starting qbank against {}", config.api_base_url));

    let api: Arc<dyn QuestionBankApi> =
        Arc::new(HttpApi::new(&config.api_base_url, config.request_timeout())?);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run(&mut terminal, &config, api).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        logger::error(&format!("Exited with error: {}", e));
    }
    result
}

async fn run(
    terminal: &mut Tui,
    config: &Config,
    api: Arc<dyn QuestionBankApi>,
) -> Result<(), Box<dyn Error>> {
    let (request_tx, request_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (response_tx, mut response_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let worker = spawn_api_worker(api, request_rx, response_tx);

    let mut app = App::new(config);
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK_RATE);

    loop {
        for envelope in app.take_outbox() {
            if request_tx.send(envelope).await.is_err() {
                logger::error("API worker stopped, request dropped");
            }
        }

        terminal.draw(|f| ui::draw(f, &app))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(envelope) = response_rx.recv() => {
                app.handle_response(envelope);
            }
            _ = ticker.tick() => {
                app.tick(Instant::now());
            }
        }

        if app.should_quit {
            break;
        }
    }

    drop(request_tx);
    worker.abort();
    logger::log("Shutting down");
    Ok(())
}
