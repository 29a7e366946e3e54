use std::time::{Duration, Instant};

/// Simulated network delay of the auth form.
pub const SUBMIT_DELAY: Duration = Duration::from_millis(1200);
/// Time the auth form keeps its contents after the modal closes.
pub const CLOSE_RESET_DELAY: Duration = Duration::from_millis(300);
/// How long the save/remove toast stays up.
pub const TOAST_TTL: Duration = Duration::from_millis(2500);

/// A one-shot deadline owned by whatever it affects.
///
/// There is no background thread: the owner polls with the current time. Dropping
/// the task, or overwriting the slot that holds it, cancels it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    due: Instant,
}

impl ScheduledTask {
    pub fn after(now: Instant, delay: Duration) -> Self {
        Self { due: now + delay }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }
}

/// Takes the task out of `slot` if it has come due.
pub fn fire(slot: &mut Option<ScheduledTask>, now: Instant) -> bool {
    match slot {
        Some(task) if task.is_due(now) => {
            *slot = None;
            true
        }
        _ => false,
    }
}
