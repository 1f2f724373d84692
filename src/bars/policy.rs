//! Server-wide switches deciding whether bars may appear at all.

use crate::skill::Skill;

/// Global and per-skill enablement, usually backed by [`crate::config::BarsConfig`].
pub trait BarPolicy: Send + Sync {
    fn bars_globally_enabled(&self) -> bool;

    fn bar_enabled(&self, skill: Skill) -> bool;

    /// Both switches at once.
    fn allows(&self, skill: Skill) -> bool {
        self.bars_globally_enabled() && self.bar_enabled(skill)
    }
}
