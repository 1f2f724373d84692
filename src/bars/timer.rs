//! Delayed-hide timers and their per-skill bookkeeping.
//!
//! Every time an `Auto` bar is shown the manager arms a one-shot timer. A newer
//! update cancels the previous timer before arming its replacement, so only the
//! last update in a burst decides when the bar disappears.

use std::collections::HashMap;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use super::BarError;
use crate::skill::Skill;

/// Callback run once when a timer elapses without being cancelled.
pub type HideTask = Box<dyn FnOnce() + Send + 'static>;

/// Cancellation side of a scheduled task.
///
/// `cancel` is idempotent and safe to call after the task has run.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    token: CancellationToken,
}

impl TimerHandle {
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Runs a callback once after a delay unless cancelled first.
///
/// A cancelled handle must guarantee the callback never starts afterwards.
pub trait Scheduler: Send + Sync {
    fn schedule_once(&self, delay: Duration, task: HideTask) -> Result<TimerHandle, BarError>;
}

/// Scheduler backed by tokio tasks.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Scheduler on the runtime the caller is running in.
    pub fn current() -> Result<Self, BarError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| BarError::Schedule {
                reason: e.to_string(),
            })
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_once(&self, delay: Duration, task: HideTask) -> Result<TimerHandle, BarError> {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let deadline = tokio::time::Instant::now()
            .checked_add(delay)
            .ok_or_else(|| BarError::Schedule {
                reason: format!("delay of {delay:?} is out of range"),
            })?;

        self.handle.spawn(async move {
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep_until(deadline) => {
                    if !cancelled.is_cancelled() {
                        task();
                    }
                }
            }
        });

        Ok(TimerHandle::new(token))
    }
}

#[derive(Debug)]
struct PendingHide {
    generation: u64,
    handle: Option<TimerHandle>,
}

/// Live hide timers by skill, at most one per skill.
///
/// Arming happens in two steps so the scheduler can be called without the
/// manager's lock held: [`reserve`](Self::reserve) claims a generation for the
/// skill, [`attach`](Self::attach) stores the handle once the scheduler returns.
/// A firing timer only acts if the record for its skill still carries its
/// generation.
#[derive(Debug, Default)]
pub struct HideTimers {
    pending: HashMap<Skill, PendingHide>,
    next_generation: u64,
}

impl HideTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a fresh generation for `skill`, cancelling whatever it replaces.
    pub fn reserve(&mut self, skill: Skill) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        let replaced = self.pending.insert(
            skill,
            PendingHide {
                generation,
                handle: None,
            },
        );
        if let Some(handle) = replaced.and_then(|stale| stale.handle) {
            handle.cancel();
        }
        generation
    }

    /// Store the handle for a reserved generation.
    ///
    /// Returns `false` and leaves the record alone when `generation` is no
    /// longer current, e.g. because the timer already fired or a newer one was
    /// reserved. The caller owns the handle in that case.
    pub fn attach(&mut self, skill: Skill, generation: u64, handle: TimerHandle) -> bool {
        match self.pending.get_mut(&skill) {
            Some(pending) if pending.generation == generation => {
                pending.handle = Some(handle);
                true
            }
            _ => false,
        }
    }

    /// Cancel and forget the timer for `skill`. Returns whether one existed.
    pub fn cancel(&mut self, skill: Skill) -> bool {
        match self.pending.remove(&skill) {
            Some(stale) => {
                if let Some(handle) = stale.handle {
                    handle.cancel();
                }
                true
            }
            None => false,
        }
    }

    /// Cancel and forget every timer.
    pub fn cancel_all(&mut self) {
        for (_, stale) in self.pending.drain() {
            if let Some(handle) = stale.handle {
                handle.cancel();
            }
        }
    }

    /// Forget the timer for `skill` without cancelling it.
    pub fn remove(&mut self, skill: Skill) {
        self.pending.remove(&skill);
    }

    /// Whether `generation` is still the live timer for `skill`.
    pub fn is_current(&self, skill: Skill, generation: u64) -> bool {
        self.pending
            .get(&skill)
            .is_some_and(|pending| pending.generation == generation)
    }

    pub fn has_pending(&self, skill: Skill) -> bool {
        self.pending.contains_key(&skill)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
