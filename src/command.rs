//! Player-facing `xpbar` command.
//!
//! ```text
//! xpbar show <skill>    pin a bar open
//! xpbar hide <skill>    pin a bar closed
//! xpbar disable         hide every bar
//! xpbar reset           restore default modes
//! ```

use std::str::FromStr;
use thiserror::Error;

use crate::bars::{BarError, BarManager, SettingTarget};
use crate::skill::{Skill, UnknownSkill};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarCommand {
    Show(Skill),
    Hide(Skill),
    DisableAll,
    Reset,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown xpbar action '{0}', expected show, hide, disable or reset")]
    UnknownAction(String),

    #[error("'{action}' needs a skill name")]
    MissingSkill { action: String },

    #[error(transparent)]
    UnknownSkill(#[from] UnknownSkill),

    #[error("Usage: xpbar <show|hide|disable|reset> [skill]")]
    Empty,
}

impl BarCommand {
    /// Parse from already-split words, without the leading `xpbar`.
    pub fn parse<I, S>(words: I) -> Result<Self, CommandError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words = words.into_iter();
        let action = words.next().ok_or(CommandError::Empty)?;
        let action = action.as_ref().to_ascii_lowercase();

        match action.as_str() {
            "show" => Ok(BarCommand::Show(skill_arg(&action, words.next())?)),
            "hide" => Ok(BarCommand::Hide(skill_arg(&action, words.next())?)),
            "disable" => Ok(BarCommand::DisableAll),
            "reset" => Ok(BarCommand::Reset),
            other => Err(CommandError::UnknownAction(other.to_string())),
        }
    }

    pub fn execute(&self, manager: &BarManager) -> Result<(), BarError> {
        match *self {
            BarCommand::Show(skill) => manager.set_mode(SettingTarget::Show, skill),
            BarCommand::Hide(skill) => manager.set_mode(SettingTarget::Hide, skill),
            BarCommand::DisableAll => manager.disable_all_bars(),
            BarCommand::Reset => manager.reset_bar_settings(),
        }
    }
}

fn skill_arg(action: &str, word: Option<impl AsRef<str>>) -> Result<Skill, CommandError> {
    let word = word.ok_or_else(|| CommandError::MissingSkill {
        action: action.to_string(),
    })?;
    Ok(word.as_ref().parse::<Skill>()?)
}

impl FromStr for BarCommand {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.split_whitespace())
    }
}
