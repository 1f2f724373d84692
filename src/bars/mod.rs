//! Transient skill progress bars.
//!
//! One [`BarManager`] per subject decides, per skill, whether a progress update
//! shows a bar, whether the bar hides itself after a quiet period, and keeps at
//! most one pending hide timer per skill.
//!
//! # Architecture
//!
//! ```text
//! progress event
//!       |
//!   BarManager ---- ModeTable (shared with settings owner)
//!       |       \
//!   BarDisplay   HideTimers ---- Scheduler (one-shot, cancellable)
//!       |
//!    Notifier (setting changes only)
//! ```

mod display;
mod error;
mod manager;
mod mode;
mod notifications;
mod policy;
mod timer;

pub use display::{BarDisplay, DisplayFactory, DisplaySnapshot, MemoryDisplays};
pub use error::BarError;
pub use manager::{BarManager, BarManagerBuilder};
pub use mode::{ModeTable, SettingTarget, VisibilityMode, default_mode, default_mode_table};
pub use notifications::{NotificationBroadcaster, Notice, Notifier};
pub use policy::BarPolicy;
pub use timer::{HideTask, HideTimers, Scheduler, TimerHandle, TokioScheduler};
