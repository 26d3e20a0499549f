use crate::app::Effect;
use crate::logger;
use crate::models::{OverallPerformance, PerformanceEntry};
use crate::toast::Toast;
use crate::utils::clamp_index;
use crate::worker::{ApiRequest, ApiResponse};
use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Default)]
pub struct PerformanceView {
    pub entries: Vec<PerformanceEntry>,
    pub overall: OverallPerformance,
    pub selected: usize,
    pub confirm_reset: bool,
    pub resetting: bool,
    pub loading: bool,
}

fn aggregate_fetches() -> Vec<Effect> {
    vec![
        Effect::Request(ApiRequest::FetchPerformance),
        Effect::Request(ApiRequest::FetchOverallPerformance),
    ]
}

impl PerformanceView {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }

    pub fn mount_effects(&self) -> Vec<Effect> {
        aggregate_fetches()
    }

    pub fn captures_input(&self) -> bool {
        self.confirm_reset
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if self.confirm_reset {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.confirm_reset = false;
                    self.resetting = true;
                    vec![Effect::Request(ApiRequest::ResetPerformance)]
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirm_reset = false;
                    vec![]
                }
                _ => vec![],
            };
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = clamp_index(self.selected + 1, self.entries.len());
            }
            KeyCode::Char('R') if !self.resetting => self.confirm_reset = true,
            KeyCode::Char('r') => {
                self.loading = true;
                return aggregate_fetches();
            }
            _ => {}
        }
        vec![]
    }

    pub fn handle_response(&mut self, response: ApiResponse) -> Vec<Effect> {
        match response {
            ApiResponse::Performance(Ok(entries)) => {
                self.entries = entries;
                self.loading = false;
                self.selected = clamp_index(self.selected, self.entries.len());
                vec![]
            }
            ApiResponse::Performance(Err(e)) => {
                self.loading = false;
                logger::error(&format!("Failed to load performance: {}", e));
                vec![Effect::Toast(Toast::error("Failed to load performance data"))]
            }
            ApiResponse::OverallPerformance(Ok(overall)) => {
                self.overall = overall;
                vec![]
            }
            ApiResponse::OverallPerformance(Err(e)) => {
                logger::error(&format!("Failed to load overall performance: {}", e));
                vec![]
            }
            ApiResponse::PerformanceReset(result) => {
                self.resetting = false;
                match result {
                    Ok(()) => {
                        let mut effects = vec![Effect::Toast(Toast::success(
                            "Performance statistics reset",
                        ))];
                        effects.extend(aggregate_fetches());
                        effects
                    }
                    Err(e) => {
                        logger::error(&format!("Failed to reset performance: {}", e));
                        vec![Effect::Toast(Toast::error("Failed to reset performance"))]
                    }
                }
            }
            _ => vec![],
        }
    }

    /// Share of correct answers in `[0, 1]`, or `None` before anything was
    /// answered.
    pub fn correct_ratio(&self) -> Option<f64> {
        if self.overall.total_answers == 0 {
            return None;
        }
        Some(
            (self.overall.total_correct as f64 / self.overall.total_answers as f64)
                .clamp(0.0, 1.0),
        )
    }
}
