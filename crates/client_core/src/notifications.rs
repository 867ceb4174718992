//! Transient toast/banner notifications raised by page controllers.

use std::{collections::VecDeque, time::Duration};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{ErrorKind, GatewayError};

const MAX_VISIBLE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub level: Level,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NotificationCenter {
    ttl: chrono::Duration,
    items: VecDeque<Notification>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(Duration::from_secs(6))
    }
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            items: VecDeque::new(),
        }
    }

    pub fn push(&mut self, level: Level, message: impl Into<String>) -> Uuid {
        self.push_at(level, message, Utc::now())
    }

    pub fn push_at(
        &mut self,
        level: Level,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.items.push_back(Notification {
            id,
            level,
            message: message.into(),
            raised_at: now,
        });
        while self.items.len() > MAX_VISIBLE {
            self.items.pop_front();
        }
        id
    }

    pub fn info(&mut self, message: impl Into<String>) -> Uuid {
        self.push(Level::Info, message)
    }

    pub fn success(&mut self, message: impl Into<String>) -> Uuid {
        self.push(Level::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> Uuid {
        self.push(Level::Error, message)
    }

    /// Converts a gateway failure into a toast. Superseded requests are silent.
    pub fn from_error(&mut self, err: &GatewayError) -> Option<Uuid> {
        let level = match err.kind() {
            ErrorKind::Cancelled => return None,
            ErrorKind::Validation | ErrorKind::NotFound => Level::Warning,
            ErrorKind::Transport | ErrorKind::Schema | ErrorKind::Server => Level::Error,
        };
        Some(self.push(level, err.user_message()))
    }

    pub fn dismiss(&mut self, id: Uuid) {
        self.items.retain(|item| item.id != id);
    }

    pub fn expire(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.items.retain(|item| now - item.raised_at < ttl);
    }

    pub fn active(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
