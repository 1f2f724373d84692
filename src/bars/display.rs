//! Display handle abstraction and an in-memory implementation.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use super::BarError;
use crate::skill::Skill;
use crate::types::SubjectId;

/// The visible indicator for one (subject, skill) pair.
///
/// Implementations must tolerate repeated `show`/`hide` calls.
pub trait BarDisplay: Send {
    /// Position within the current level, in `[0, 1]`.
    fn set_progress(&mut self, progress: f64) -> Result<(), BarError>;

    fn show(&mut self) -> Result<(), BarError>;

    fn hide(&mut self) -> Result<(), BarError>;
}

/// Creates display handles on first use.
pub trait DisplayFactory: Send + Sync {
    fn create(&self, subject: &SubjectId, skill: Skill) -> Result<Box<dyn BarDisplay>, BarError>;
}

/// Last known state of an in-memory display.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplaySnapshot {
    pub progress: f64,
    pub visible: bool,
    pub shows: usize,
    pub hides: usize,
}

/// Headless displays that only record what they were told.
///
/// Cloning shares the recorded state, so a host can keep one handle for
/// inspection and hand the other to a manager.
#[derive(Debug, Clone, Default)]
pub struct MemoryDisplays {
    bars: Arc<Mutex<HashMap<Skill, DisplaySnapshot>>>,
}

impl MemoryDisplays {
    pub fn new() -> Self {
        Self::default()
    }

    /// State of the display for `skill`, if one was ever created.
    pub fn snapshot(&self, skill: Skill) -> Option<DisplaySnapshot> {
        self.bars.lock().get(&skill).copied()
    }

    pub fn is_visible(&self, skill: Skill) -> bool {
        self.snapshot(skill).is_some_and(|bar| bar.visible)
    }

    pub fn created(&self) -> usize {
        self.bars.lock().len()
    }
}

impl DisplayFactory for MemoryDisplays {
    fn create(&self, _subject: &SubjectId, skill: Skill) -> Result<Box<dyn BarDisplay>, BarError> {
        self.bars.lock().entry(skill).or_default();
        Ok(Box::new(MemoryBar {
            skill,
            bars: self.bars.clone(),
        }))
    }
}

struct MemoryBar {
    skill: Skill,
    bars: Arc<Mutex<HashMap<Skill, DisplaySnapshot>>>,
}

impl MemoryBar {
    fn with_state(&self, f: impl FnOnce(&mut DisplaySnapshot)) {
        f(self.bars.lock().entry(self.skill).or_default());
    }
}

impl BarDisplay for MemoryBar {
    fn set_progress(&mut self, progress: f64) -> Result<(), BarError> {
        self.with_state(|bar| bar.progress = progress);
        Ok(())
    }

    fn show(&mut self) -> Result<(), BarError> {
        self.with_state(|bar| {
            bar.visible = true;
            bar.shows += 1;
        });
        Ok(())
    }

    fn hide(&mut self) -> Result<(), BarError> {
        self.with_state(|bar| {
            bar.visible = false;
            bar.hides += 1;
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_display_records_calls() {
        let displays = MemoryDisplays::new();
        let mut bar = displays
            .create(&SubjectId::new("steve"), Skill::Fishing)
            .unwrap();

        assert_eq!(displays.snapshot(Skill::Fishing), Some(DisplaySnapshot::default()));

        bar.set_progress(0.25).unwrap();
        bar.show().unwrap();
        assert!(displays.is_visible(Skill::Fishing));

        bar.hide().unwrap();
        bar.hide().unwrap();
        let snapshot = displays.snapshot(Skill::Fishing).unwrap();
        assert!(!snapshot.visible);
        assert_eq!(snapshot.progress, 0.25);
        assert_eq!(snapshot.shows, 1);
        assert_eq!(snapshot.hides, 2);
        assert_eq!(displays.snapshot(Skill::Mining), None);
    }
}
