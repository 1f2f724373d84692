pub mod bars;
pub mod command;
pub mod config;
pub mod io;
pub mod logging;
pub mod progress;
pub mod skill;
pub mod types;

pub use bars::{
    BarDisplay, BarError, BarManager, BarPolicy, DisplayFactory, MemoryDisplays, ModeTable,
    NotificationBroadcaster, Notice, Notifier, Scheduler, SettingTarget, TokioScheduler,
    VisibilityMode, default_mode_table,
};
pub use command::{BarCommand, CommandError};
pub use config::Settings;
pub use progress::{ProgressProvider, SkillProgress};
pub use skill::Skill;
pub use types::SubjectId;
