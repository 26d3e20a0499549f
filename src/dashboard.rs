use crate::app::{Effect, Route};
use crate::logger;
use crate::models::DashboardStats;
use crate::worker::{ApiRequest, ApiResponse};
use crossterm::event::{KeyCode, KeyEvent};

/// Landing view: four counters rolled up from the service.
#[derive(Debug, Default)]
pub struct DashboardView {
    pub stats: Option<DashboardStats>,
    pub failed: bool,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount_effects(&self) -> Vec<Effect> {
        vec![Effect::Request(ApiRequest::FetchDashboard)]
    }

    /// Quick actions jump straight to the view that performs them.
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Char('a') => vec![Effect::Navigate(Route::Questions)],
            KeyCode::Char('n') => vec![Effect::Navigate(Route::Exams)],
            KeyCode::Char('p') => vec![Effect::Navigate(Route::Performance)],
            KeyCode::Char('r') => self.mount_effects(),
            _ => vec![],
        }
    }

    pub fn handle_response(&mut self, response: ApiResponse) -> Vec<Effect> {
        match response {
            ApiResponse::Dashboard(Ok(stats)) => {
                self.stats = Some(stats);
                self.failed = false;
            }
            ApiResponse::Dashboard(Err(e)) => {
                logger::error(&format!("Failed to load dashboard: {}", e));
                self.failed = true;
            }
            _ => {}
        }
        vec![]
    }
}
