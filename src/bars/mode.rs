//! Visibility modes and the shared per-subject mode table.

use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::skill::Skill;

/// How a skill's bar reacts to progress updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityMode {
    /// Shown on update, hidden again after the quiet period.
    #[default]
    Auto,
    /// Shown on update and never hidden automatically.
    AlwaysOn,
    /// Never shown; updates are ignored.
    ForceHidden,
}

/// Requested change passed to [`BarManager::set_mode`](super::BarManager::set_mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingTarget {
    /// Pin the bar open (`AlwaysOn`).
    Show,
    /// Pin the bar closed (`ForceHidden`).
    Hide,
    /// Restore every skill to its default mode.
    Reset,
    /// Disable a single bar. Same effect as `Hide`.
    Disable,
}

impl SettingTarget {
    pub fn name(self) -> &'static str {
        match self {
            SettingTarget::Show => "Show",
            SettingTarget::Hide => "Hide",
            SettingTarget::Reset => "Reset",
            SettingTarget::Disable => "Disable",
        }
    }
}

impl fmt::Display for SettingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Default mode for a single skill: child skills start hidden.
pub fn default_mode(skill: Skill) -> VisibilityMode {
    if skill.is_child() {
        VisibilityMode::ForceHidden
    } else {
        VisibilityMode::Auto
    }
}

/// A fresh table holding the default mode for every skill.
pub fn default_mode_table() -> ModeTable {
    ModeTable::from_modes(Skill::ALL.into_iter().map(|skill| (skill, default_mode(skill))))
}

/// Skill to mode mapping shared between the bar manager and whoever owns the
/// subject's settings.
///
/// Cloning yields another handle onto the same map, so a change made through
/// one handle is visible through every other. Each write touches a single key.
/// A skill without an entry reads as [`VisibilityMode::Auto`].
#[derive(Debug, Clone, Default)]
pub struct ModeTable {
    modes: Arc<RwLock<HashMap<Skill, VisibilityMode>>>,
}

impl ModeTable {
    /// An empty table: every skill reads as `Auto`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_modes(modes: impl IntoIterator<Item = (Skill, VisibilityMode)>) -> Self {
        Self {
            modes: Arc::new(RwLock::new(modes.into_iter().collect())),
        }
    }

    pub fn get(&self, skill: Skill) -> VisibilityMode {
        self.modes.read().get(&skill).copied().unwrap_or_default()
    }

    /// Write a mode, returning the previous one.
    pub fn set(&self, skill: Skill, mode: VisibilityMode) -> VisibilityMode {
        self.modes
            .write()
            .insert(skill, mode)
            .unwrap_or_default()
    }

    /// Overwrite every skill with its default mode.
    pub fn reset_to_defaults(&self) {
        let mut modes = self.modes.write();
        for skill in Skill::ALL {
            modes.insert(skill, default_mode(skill));
        }
    }

    /// Explicit entries, in skill order.
    pub fn entries(&self) -> Vec<(Skill, VisibilityMode)> {
        self.snapshot().into_iter().collect()
    }

    /// Copy of the explicit entries, for persisting.
    pub fn snapshot(&self) -> BTreeMap<Skill, VisibilityMode> {
        self.modes
            .read()
            .iter()
            .map(|(skill, mode)| (*skill, *mode))
            .collect()
    }

    /// True when both handles point at the same underlying map.
    pub fn shares_with(&self, other: &ModeTable) -> bool {
        Arc::ptr_eq(&self.modes, &other.modes)
    }
}

impl Serialize for ModeTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.snapshot().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ModeTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let modes = BTreeMap::<Skill, VisibilityMode>::deserialize(deserializer)?;
        Ok(ModeTable::from_modes(modes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_covers_every_skill() {
        let table = default_mode_table();
        assert_eq!(table.entries().len(), Skill::ALL.len());
        assert_eq!(table.get(Skill::Salvage), VisibilityMode::ForceHidden);
        assert_eq!(table.get(Skill::Smelting), VisibilityMode::ForceHidden);
        assert_eq!(table.get(Skill::Mining), VisibilityMode::Auto);
    }

    #[test]
    fn test_absent_key_reads_auto() {
        let table = ModeTable::new();
        assert_eq!(table.get(Skill::Salvage), VisibilityMode::Auto);
        assert!(table.entries().is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let table = ModeTable::new();
        let other = table.clone();
        let previous = table.set(Skill::Axes, VisibilityMode::AlwaysOn);

        assert_eq!(previous, VisibilityMode::Auto);
        assert_eq!(other.get(Skill::Axes), VisibilityMode::AlwaysOn);
        assert!(table.shares_with(&other));
        assert!(!table.shares_with(&ModeTable::new()));
    }

    #[test]
    fn test_reset_to_defaults_overwrites_in_place() {
        let table = ModeTable::from_modes([
            (Skill::Salvage, VisibilityMode::AlwaysOn),
            (Skill::Mining, VisibilityMode::ForceHidden),
        ]);
        let observer = table.clone();
        table.reset_to_defaults();

        for skill in Skill::ALL {
            assert_eq!(observer.get(skill), default_mode(skill), "{skill}");
        }
    }

    #[test]
    fn test_serialized_form() {
        let table = ModeTable::from_modes([
            (Skill::Repair, VisibilityMode::AlwaysOn),
            (Skill::Mining, VisibilityMode::Auto),
        ]);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"mining":"auto","repair":"always_on"}"#);

        let restored: ModeTable = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.get(Skill::Repair), VisibilityMode::AlwaysOn);
        assert_eq!(restored.entries().len(), 2);
    }
}
