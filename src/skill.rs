//! The closed set of progress categories a subject can advance in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A progress category.
///
/// Child skills level up from their parents' activity and start with their
/// bar force-hidden; every other skill is top-level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Acrobatics,
    Alchemy,
    Archery,
    Axes,
    Excavation,
    Fishing,
    Herbalism,
    Mining,
    Repair,
    Salvage,
    Smelting,
    Swords,
    Taming,
    Unarmed,
    Woodcutting,
}

impl Skill {
    /// Every skill, each exactly once.
    pub const ALL: [Skill; 15] = [
        Skill::Acrobatics,
        Skill::Alchemy,
        Skill::Archery,
        Skill::Axes,
        Skill::Excavation,
        Skill::Fishing,
        Skill::Herbalism,
        Skill::Mining,
        Skill::Repair,
        Skill::Salvage,
        Skill::Smelting,
        Skill::Swords,
        Skill::Taming,
        Skill::Unarmed,
        Skill::Woodcutting,
    ];

    /// Skills this one derives its progress from. Empty for top-level skills.
    pub fn parents(self) -> &'static [Skill] {
        match self {
            Skill::Salvage => &[Skill::Repair, Skill::Fishing],
            Skill::Smelting => &[Skill::Mining, Skill::Repair],
            _ => &[],
        }
    }

    pub fn is_child(self) -> bool {
        !self.parents().is_empty()
    }

    /// Human-readable name, e.g. `"Woodcutting"`.
    pub fn name(self) -> &'static str {
        match self {
            Skill::Acrobatics => "Acrobatics",
            Skill::Alchemy => "Alchemy",
            Skill::Archery => "Archery",
            Skill::Axes => "Axes",
            Skill::Excavation => "Excavation",
            Skill::Fishing => "Fishing",
            Skill::Herbalism => "Herbalism",
            Skill::Mining => "Mining",
            Skill::Repair => "Repair",
            Skill::Salvage => "Salvage",
            Skill::Smelting => "Smelting",
            Skill::Swords => "Swords",
            Skill::Taming => "Taming",
            Skill::Unarmed => "Unarmed",
            Skill::Woodcutting => "Woodcutting",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when text does not name a known skill.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown skill '{0}'")]
pub struct UnknownSkill(pub String);

impl FromStr for Skill {
    type Err = UnknownSkill;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Skill::ALL
            .into_iter()
            .find(|skill| skill.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownSkill(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_is_exhaustive_and_unique() {
        let unique: HashSet<Skill> = Skill::ALL.into_iter().collect();
        assert_eq!(unique.len(), Skill::ALL.len());
    }

    #[test]
    fn test_child_skills() {
        let children: Vec<Skill> = Skill::ALL.into_iter().filter(|s| s.is_child()).collect();
        assert_eq!(children, vec![Skill::Salvage, Skill::Smelting]);
        assert!(!Skill::Mining.is_child());
        assert!(Skill::Smelting.parents().contains(&Skill::Mining));
    }

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!("mining".parse::<Skill>().unwrap(), Skill::Mining);
        assert_eq!(" WoodCutting ".parse::<Skill>().unwrap(), Skill::Woodcutting);
        assert_eq!(
            "digging".parse::<Skill>().unwrap_err(),
            UnknownSkill("digging".to_string())
        );
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Skill::Herbalism).unwrap();
        assert_eq!(json, "\"herbalism\"");
        let back: Skill = serde_json::from_str("\"repair\"").unwrap();
        assert_eq!(back, Skill::Repair);
    }
}
