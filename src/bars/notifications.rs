//! Notices sent to a subject when its bar settings change.

use std::fmt;
use tokio::sync::broadcast;

use super::mode::SettingTarget;
use crate::skill::Skill;
use crate::types::SubjectId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// One skill's bar was pinned shown or hidden.
    SettingChanged { skill: Skill, target: SettingTarget },
    /// Every skill went back to its default mode.
    Reset,
    /// Every bar was force-hidden at once.
    AllDisabled,
}

impl Notice {
    /// Localization key for the message.
    pub fn message_key(&self) -> &'static str {
        match self {
            Notice::SettingChanged { .. } => "Commands.XPBar.SettingChanged",
            Notice::Reset => "Commands.XPBar.Reset",
            Notice::AllDisabled => "Commands.XPBar.DisableAll",
        }
    }

    /// Positional arguments for the localized message.
    pub fn args(&self) -> Vec<String> {
        match self {
            Notice::SettingChanged { skill, target } => {
                vec![skill.name().to_string(), target.name().to_string()]
            }
            Notice::Reset | Notice::AllDisabled => Vec::new(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::SettingChanged { skill, target } => {
                write!(f, "{skill} XP bar setting changed to {target}")
            }
            Notice::Reset => f.write_str("XP bar settings have been reset"),
            Notice::AllDisabled => f.write_str("All XP bars have been disabled"),
        }
    }
}

/// Fire-and-forget channel to the subject.
pub trait Notifier: Send + Sync {
    fn notify(&self, subject: &SubjectId, notice: Notice);
}

/// Delivers notices to every subscriber over a broadcast channel.
#[derive(Debug, Clone)]
pub struct NotificationBroadcaster {
    sender: broadcast::Sender<(SubjectId, Notice)>,
}

impl NotificationBroadcaster {
    /// Create a new broadcaster with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<(SubjectId, Notice)> {
        self.sender.subscribe()
    }
}

impl Notifier for NotificationBroadcaster {
    fn notify(&self, subject: &SubjectId, notice: Notice) {
        match self.sender.send((subject.clone(), notice.clone())) {
            Ok(count) => {
                crate::debug_event!("notify", "sent", "{notice:?} to {subject} ({count} subscribers)");
            }
            Err(_) => {
                // No receivers, this is fine
                crate::debug_event!("notify", "dropped", "no subscribers for {notice:?}");
            }
        }
    }
}
