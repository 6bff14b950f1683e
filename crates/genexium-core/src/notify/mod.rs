//! Transient toast notifications.
//!
//! Every notification removes itself a fixed time after creation unless the
//! user dismissed it first. Both removal paths are idempotent.

use std::time::{Duration, Instant};

use uuid::Uuid;

/// How long a notification stays up.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// Severity, which only affects presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Danger,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub level: Level,
    pub message: String,
    pub created_at: Instant,
}

impl Notification {
    pub fn is_expired_at(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= ttl
    }

    /// Fraction of the lifetime left, 1.0 when fresh and 0.0 when due.
    pub fn remaining_at(&self, now: Instant, ttl: Duration) -> f32 {
        let elapsed = now.saturating_duration_since(self.created_at).as_secs_f32();
        (1.0 - elapsed / ttl.as_secs_f32()).max(0.0)
    }
}

/// All live notifications, oldest first.
#[derive(Debug)]
pub struct NotificationCenter {
    items: Vec<Notification>,
    ttl: Duration,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            ttl: NOTIFICATION_TTL,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn push(&mut self, level: Level, message: impl Into<String>) -> Uuid {
        self.push_at(level, message, Instant::now())
    }

    pub fn push_at(&mut self, level: Level, message: impl Into<String>, now: Instant) -> Uuid {
        let id = Uuid::new_v4();
        self.items.push(Notification {
            id,
            level,
            message: message.into(),
            created_at: now,
        });
        id
    }

    /// Remove a notification. Returns `false` if it was already gone.
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Dismiss the most recent notification, if any.
    pub fn dismiss_latest(&mut self) -> bool {
        self.items.pop().is_some()
    }

    /// Drop everything past its lifetime. Returns true if anything was removed.
    pub fn tick(&mut self) -> bool {
        self.expire_at(Instant::now()) > 0
    }

    pub fn expire_at(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.items.len();
        self.items.retain(|n| !n.is_expired_at(now, ttl));
        before - self.items.len()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.items.iter().any(|n| n.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Live notifications, most recent first.
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_five_seconds() {
        let mut center = NotificationCenter::new();
        let t0 = Instant::now();
        let id = center.push_at(Level::Success, "saved", t0);

        assert_eq!(center.expire_at(t0 + Duration::from_millis(4999)), 0);
        assert!(center.contains(id));

        assert_eq!(center.expire_at(t0 + Duration::from_millis(5000)), 1);
        assert!(!center.contains(id));
    }

    #[test]
    fn dismiss_before_expiry_makes_expiry_a_noop() {
        let mut center = NotificationCenter::new();
        let t0 = Instant::now();
        let id = center.push_at(Level::Info, "hello", t0);

        assert!(center.dismiss(id));
        assert!(!center.dismiss(id), "second dismissal must be a no-op");
        assert_eq!(center.expire_at(t0 + Duration::from_secs(6)), 0);
        assert!(center.is_empty());
    }

    #[test]
    fn expiry_is_per_notification() {
        let mut center = NotificationCenter::new();
        let t0 = Instant::now();
        let first = center.push_at(Level::Info, "first", t0);
        let second = center.push_at(Level::Warning, "second", t0 + Duration::from_secs(3));

        center.expire_at(t0 + Duration::from_secs(5));
        assert!(!center.contains(first));
        assert!(center.contains(second));
    }

    #[test]
    fn visible_is_newest_first() {
        let mut center = NotificationCenter::new();
        center.push(Level::Info, "a");
        center.push(Level::Info, "b");
        let order: Vec<&str> = center.visible().map(|n| n.message.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);

        assert!(center.dismiss_latest());
        assert_eq!(center.len(), 1);
        assert_eq!(center.visible().next().unwrap().message, "a");
    }

    #[test]
    fn remaining_fraction_counts_down() {
        let t0 = Instant::now();
        let n = Notification {
            id: Uuid::nil(),
            level: Level::Success,
            message: String::new(),
            created_at: t0,
        };
        assert!((n.remaining_at(t0, NOTIFICATION_TTL) - 1.0).abs() < f32::EPSILON);
        assert_eq!(n.remaining_at(t0 + Duration::from_secs(10), NOTIFICATION_TTL), 0.0);
    }
}
