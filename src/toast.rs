use crate::logger;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const MAX_VISIBLE_TOASTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
    pub created_at: Instant,
}

impl Toast {
    fn new(kind: ToastKind, title: &str, message: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message: message.to_string(),
            created_at: Instant::now(),
        }
    }

    pub fn success(message: &str) -> Self {
        Self::new(ToastKind::Success, "Success", message)
    }

    pub fn info(title: &str, message: &str) -> Self {
        Self::new(ToastKind::Info, title, message)
    }

    pub fn error(message: &str) -> Self {
        Self::new(ToastKind::Error, "Error", message)
    }
}

#[derive(Debug)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    ttl: Duration,
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            ttl,
        }
    }

    pub fn push(&mut self, toast: Toast) {
        if toast.kind == ToastKind::Error {
            logger::error(&format!("Toast: {}", toast.message));
        }
        if self.toasts.len() == MAX_VISIBLE_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(toast);
    }

    /// Drops toasts older than the configured lifetime. Returns true when
    /// anything was removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        let ttl = self.ttl;
        self.toasts
            .retain(|t| now.saturating_duration_since(t.created_at) < ttl);
        self.toasts.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_keeps_newest_when_full() {
        let mut queue = ToastQueue::new(Duration::from_secs(5));
        for i in 0..5 {
            queue.push(Toast::success(&format!("toast {}", i)));
        }
        assert_eq!(queue.len(), MAX_VISIBLE_TOASTS);
        let messages: Vec<&str> = queue.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["toast 2", "toast 3", "toast 4"]);
    }

    #[test]
    fn test_expire_removes_old_toasts() {
        let mut queue = ToastQueue::new(Duration::from_secs(4));
        queue.push(Toast::error("Failed to load exams"));
        let created = queue.latest().unwrap().created_at;

        assert!(!queue.expire(created + Duration::from_secs(1)));
        assert_eq!(queue.len(), 1);

        assert!(queue.expire(created + Duration::from_secs(4)));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_constructors_set_kind_and_title() {
        let toast = Toast::error("boom");
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.title, "Error");

        let toast = Toast::info("Exam complete", "Your answers were recorded");
        assert_eq!(toast.kind, ToastKind::Info);
        assert_eq!(toast.title, "Exam complete");
    }
}
