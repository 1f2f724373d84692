//! Error types for the bar manager and its collaborators.

use thiserror::Error;

use crate::skill::Skill;

/// Failures raised by collaborators (displays, schedulers) or by a
/// misconfigured manager.
///
/// Policy short-circuits such as a force-hidden skill are not errors; those
/// operations return `Ok(())` without doing anything.
#[derive(Error, Debug)]
pub enum BarError {
    #[error("Display for {skill} failed: {reason}")]
    Display { skill: Skill, reason: String },

    #[error("Failed to schedule hide timer: {reason}")]
    Schedule { reason: String },

    #[error("Invalid bar manager configuration: {reason}")]
    Config { reason: String },
}

impl BarError {
    pub fn display(skill: Skill, err: impl std::fmt::Display) -> Self {
        BarError::Display {
            skill,
            reason: err.to_string(),
        }
    }
}
