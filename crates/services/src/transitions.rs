//! Delayed screen transitions with cancellation.
//!
//! Entries are stamped with the scheduler generation at the time they are
//! scheduled. [`TransitionScheduler::invalidate_all`] bumps the generation,
//! so nothing scheduled before it can ever be returned by `take_due`.

use std::time::Duration;

use tokio::time::Instant;

/// Handle for cancelling one scheduled transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionToken {
    id: u64,
    generation: u64,
}

impl TransitionToken {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
struct Scheduled<T> {
    token: TransitionToken,
    deadline: Instant,
    transition: T,
}

#[derive(Debug)]
pub struct TransitionScheduler<T> {
    generation: u64,
    next_id: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for TransitionScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TransitionScheduler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            generation: 0,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Schedule `transition` to fire `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, transition: T) -> TransitionToken {
        let deadline = now + delay;
        let token = TransitionToken {
            id: self.next_id,
            generation: self.generation,
        };
        self.next_id += 1;
        self.pending.push(Scheduled {
            token,
            deadline,
            transition,
        });
        token
    }

    /// Drop a pending transition. Returns `false` if it already fired or was
    /// invalidated.
    pub fn cancel(&mut self, token: TransitionToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|entry| entry.token != token);
        self.pending.len() != before
    }

    /// Forget everything scheduled so far.
    pub fn invalidate_all(&mut self) {
        self.generation += 1;
        self.pending.clear();
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest deadline among live entries.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending
            .iter()
            .filter(|entry| entry.token.generation == self.generation)
            .map(|entry| entry.deadline)
            .min()
    }

    /// Remove and return every live transition whose deadline has passed, in
    /// deadline order.
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let generation = self.generation;
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .filter(|entry| entry.token.generation == generation)
            .partition(|entry| entry.deadline <= now);
        self.pending = pending;
        due.sort_by_key(|entry| (entry.deadline, entry.token.id));
        due.into_iter().map(|entry| entry.transition).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn fires_only_after_deadline() {
        let start = Instant::now();
        let mut scheduler = TransitionScheduler::new();
        scheduler.schedule(start, 3 * SECOND, "next");

        assert!(scheduler.take_due(start + 2 * SECOND).is_empty());
        assert_eq!(scheduler.take_due(start + 3 * SECOND), vec!["next"]);
        assert!(scheduler.take_due(start + 10 * SECOND).is_empty());
        assert!(scheduler.is_idle());
    }

    #[test]
    fn due_entries_come_back_in_deadline_order() {
        let start = Instant::now();
        let mut scheduler = TransitionScheduler::new();
        scheduler.schedule(start, 8 * SECOND, "lost");
        scheduler.schedule(start, 3 * SECOND, "next");
        assert_eq!(scheduler.next_deadline(), Some(start + 3 * SECOND));
        assert_eq!(scheduler.take_due(start + 9 * SECOND), vec!["next", "lost"]);
    }

    #[test]
    fn cancelled_entry_never_fires() {
        let start = Instant::now();
        let mut scheduler = TransitionScheduler::new();
        let token = scheduler.schedule(start, SECOND, "next");
        assert!(scheduler.cancel(token));
        assert!(!scheduler.cancel(token));
        assert!(scheduler.take_due(start + 5 * SECOND).is_empty());
    }

    #[test]
    fn invalidate_all_drops_stale_entries() {
        let start = Instant::now();
        let mut scheduler = TransitionScheduler::new();
        let stale = scheduler.schedule(start, SECOND, "stale");
        scheduler.invalidate_all();
        let fresh = scheduler.schedule(start, 2 * SECOND, "fresh");

        assert_ne!(stale.generation(), fresh.generation());
        assert!(!scheduler.cancel(stale));
        assert_eq!(scheduler.take_due(start + 5 * SECOND), vec!["fresh"]);
    }

    #[test]
    fn empty_scheduler_has_no_deadline() {
        let scheduler: TransitionScheduler<()> = TransitionScheduler::default();
        assert_eq!(scheduler.next_deadline(), None);
        assert_eq!(scheduler.generation(), 0);
    }
}
