//! Progress sources for bars.

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::skill::Skill;
use crate::types::SubjectId;

/// Supplies a subject's position within its current level.
pub trait ProgressProvider: Send + Sync {
    /// Fraction of the current level completed, in `[0, 1]`.
    fn progress_fraction(&self, subject: &SubjectId, skill: Skill) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LevelProgress {
    xp: u64,
    xp_to_next: u64,
}

/// In-memory experience tracker.
///
/// Stores raw experience and the amount needed for the next level; unknown
/// entries report zero progress.
#[derive(Debug, Default)]
pub struct SkillProgress {
    levels: RwLock<HashMap<(SubjectId, Skill), LevelProgress>>,
}

impl SkillProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the experience held within the current level.
    pub fn record(&self, subject: &SubjectId, skill: Skill, xp: u64, xp_to_next: u64) {
        self.levels
            .write()
            .insert((subject.clone(), skill), LevelProgress { xp, xp_to_next });
    }

    pub fn forget(&self, subject: &SubjectId) {
        self.levels.write().retain(|(owner, _), _| owner != subject);
    }
}

impl ProgressProvider for SkillProgress {
    fn progress_fraction(&self, subject: &SubjectId, skill: Skill) -> f64 {
        let levels = self.levels.read();
        let Some(level) = levels.get(&(subject.clone(), skill)) else {
            return 0.0;
        };
        if level.xp_to_next == 0 {
            return 0.0;
        }
        (level.xp as f64 / level.xp_to_next as f64).clamp(0.0, 1.0)
    }
}
