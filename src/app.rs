use crate::config::Config;
use crate::dashboard::DashboardView;
use crate::exams::ExamsView;
use crate::logger;
use crate::performance::PerformanceView;
use crate::questions::QuestionsView;
use crate::toast::{Toast, ToastQueue};
use crate::worker::{ApiRequest, ApiResponse, Envelope};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Questions,
    Exams,
    Performance,
}

impl Route {
    pub const ALL: [Route; 4] = [
        Route::Dashboard,
        Route::Questions,
        Route::Exams,
        Route::Performance,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Questions => "Questions",
            Route::Exams => "Exams",
            Route::Performance => "Performance",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Route::Dashboard => 0,
            Route::Questions => 1,
            Route::Exams => 2,
            Route::Performance => 3,
        }
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// What a view asks the shell to do after handling input or a response.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Request(ApiRequest),
    Toast(Toast),
    Navigate(Route),
}

#[derive(Debug)]
pub enum Screen {
    Dashboard(DashboardView),
    Questions(QuestionsView),
    Exams(ExamsView),
    Performance(PerformanceView),
}

impl Screen {
    fn mount(route: Route) -> Self {
        match route {
            Route::Dashboard => Screen::Dashboard(DashboardView::new()),
            Route::Questions => Screen::Questions(QuestionsView::new()),
            Route::Exams => Screen::Exams(ExamsView::new()),
            Route::Performance => Screen::Performance(PerformanceView::new()),
        }
    }

    pub fn route(&self) -> Route {
        match self {
            Screen::Dashboard(_) => Route::Dashboard,
            Screen::Questions(_) => Route::Questions,
            Screen::Exams(_) => Route::Exams,
            Screen::Performance(_) => Route::Performance,
        }
    }

    /// True while a modal, prompt or text field owns the keyboard.
    pub fn captures_input(&self) -> bool {
        match self {
            Screen::Dashboard(_) => false,
            Screen::Questions(view) => view.captures_input(),
            Screen::Exams(view) => view.captures_input(),
            Screen::Performance(view) => view.captures_input(),
        }
    }

    fn mount_effects(&self) -> Vec<Effect> {
        match self {
            Screen::Dashboard(view) => view.mount_effects(),
            Screen::Questions(view) => view.mount_effects(),
            Screen::Exams(view) => view.mount_effects(),
            Screen::Performance(view) => view.mount_effects(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match self {
            Screen::Dashboard(view) => view.handle_key(key),
            Screen::Questions(view) => view.handle_key(key),
            Screen::Exams(view) => view.handle_key(key),
            Screen::Performance(view) => view.handle_key(key),
        }
    }

    fn handle_response(&mut self, response: ApiResponse) -> Vec<Effect> {
        match self {
            Screen::Dashboard(view) => view.handle_response(response),
            Screen::Questions(view) => view.handle_response(response),
            Screen::Exams(view) => view.handle_response(response),
            Screen::Performance(view) => view.handle_response(response),
        }
    }
}

pub struct App {
    pub screen: Screen,
    pub toasts: ToastQueue,
    pub should_quit: bool,
    generation: u64,
    outbox: Vec<Envelope<ApiRequest>>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let mut app = Self {
            screen: Screen::mount(Route::Dashboard),
            toasts: ToastQueue::new(config.toast_duration()),
            should_quit: false,
            generation: 0,
            outbox: Vec::new(),
        };
        let effects = app.screen.mount_effects();
        app.apply(effects);
        app
    }

    pub fn route(&self) -> Route {
        self.screen.route()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Mounts a fresh view. Requests the old view queued but never sent are
    /// discarded, and responses still in flight for it will carry a stale
    /// generation and be dropped.
    pub fn navigate(&mut self, route: Route) {
        if route == self.route() {
            return;
        }
        logger::log(&format!("Navigating to {}", route.title()));
        self.generation += 1;
        let generation = self.generation;
        self.outbox.retain(|e| e.generation == generation);
        self.screen = Screen::mount(route);
        let effects = self.screen.mount_effects();
        self.apply(effects);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if !self.screen.captures_input() {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char(c @ '1'..='4') => {
                    let index = c as usize - '1' as usize;
                    self.navigate(Route::ALL[index]);
                    return;
                }
                KeyCode::Tab => {
                    self.navigate(self.route().next());
                    return;
                }
                KeyCode::BackTab => {
                    self.navigate(self.route().prev());
                    return;
                }
                _ => {}
            }
        }

        let effects = self.screen.handle_key(key);
        self.apply(effects);
    }

    pub fn handle_response(&mut self, envelope: Envelope<ApiResponse>) {
        if envelope.generation != self.generation {
            logger::log(&format!(
                "Dropping stale response from generation {} (current {})",
                envelope.generation, self.generation
            ));
            return;
        }
        let effects = self.screen.handle_response(envelope.payload);
        self.apply(effects);
    }

    pub fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Request(payload) => self.outbox.push(Envelope {
                    generation: self.generation,
                    payload,
                }),
                Effect::Toast(toast) => self.toasts.push(toast),
                Effect::Navigate(route) => self.navigate(route),
            }
        }
    }

    pub fn take_outbox(&mut self) -> Vec<Envelope<ApiRequest>> {
        std::mem::take(&mut self.outbox)
    }

    /// Returns true when the screen needs a redraw.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.toasts.expire(now)
    }
}
