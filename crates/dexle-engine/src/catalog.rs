//! Immutable entity catalog.
//!
//! The catalog is loaded once per session by an external loader and only read
//! afterwards. Entities are kept sorted by identifier so iteration order doubles
//! as the picker's tie-break order.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, EngineResult};

pub type EntityId = u32;

/// Closed set of categorical trait values. `None` fills an inapplicable slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Trait {
    #[default]
    None,
    Normal,
    Electric,
    Psychic,
    Poison,
    Ghost,
    Fire,
    Water,
    Ground,
    Fighting,
    Grass,
    Flying,
    Bug,
    Dragon,
    Fairy,
    Steel,
    Dark,
    Ice,
    Rock,
}

impl Trait {
    pub const ALL: [Trait; 19] = [
        Trait::None,
        Trait::Normal,
        Trait::Electric,
        Trait::Psychic,
        Trait::Poison,
        Trait::Ghost,
        Trait::Fire,
        Trait::Water,
        Trait::Ground,
        Trait::Fighting,
        Trait::Grass,
        Trait::Flying,
        Trait::Bug,
        Trait::Dragon,
        Trait::Fairy,
        Trait::Steel,
        Trait::Dark,
        Trait::Ice,
        Trait::Rock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Trait::None => "None",
            Trait::Normal => "Normal",
            Trait::Electric => "Electric",
            Trait::Psychic => "Psychic",
            Trait::Poison => "Poison",
            Trait::Ghost => "Ghost",
            Trait::Fire => "Fire",
            Trait::Water => "Water",
            Trait::Ground => "Ground",
            Trait::Fighting => "Fighting",
            Trait::Grass => "Grass",
            Trait::Flying => "Flying",
            Trait::Bug => "Bug",
            Trait::Dragon => "Dragon",
            Trait::Fairy => "Fairy",
            Trait::Steel => "Steel",
            Trait::Dark => "Dark",
            Trait::Ice => "Ice",
            Trait::Rock => "Rock",
        }
    }

    /// Stable numeric code (0 for `None`, then declaration order).
    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trait {
    type Err = EngineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Trait::None);
        }
        Trait::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| EngineError::InvalidCatalog(format!("unknown trait {trimmed:?}")))
    }
}

impl TryFrom<String> for Trait {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Trait> for &'static str {
    fn from(value: Trait) -> Self {
        value.as_str()
    }
}

/// One guessable catalog row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub generation: u32,
    #[serde(alias = "type1")]
    pub trait1: Trait,
    #[serde(default, alias = "type2")]
    pub trait2: Trait,
    /// Absent measurements are unconstrained by the pool filter.
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
}

impl Entity {
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        generation: u32,
        trait1: Trait,
        trait2: Trait,
        height: Option<f64>,
        weight: Option<f64>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            generation,
            trait1,
            trait2,
            height,
            weight,
        }
    }

    fn check(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::InvalidCatalog(format!(
                "entity {} has an empty name",
                self.id
            )));
        }
        if self.generation == 0 {
            return Err(EngineError::InvalidCatalog(format!(
                "{} has generation 0; generations start at 1",
                self.name
            )));
        }
        for (label, value) in [("height", self.height), ("weight", self.weight)] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(EngineError::InvalidCatalog(format!(
                        "{} has invalid {label} {v}",
                        self.name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Read-only list of candidate entities, sorted by identifier.
#[derive(Clone, Debug)]
pub struct Catalog {
    entities: Vec<Entity>,
}

impl Catalog {
    /// Validate and index a loaded entity list.
    ///
    /// Rejects empty catalogs, duplicate identifiers, duplicate names
    /// (case-insensitive) and out-of-range attribute values.
    pub fn new(mut entities: Vec<Entity>) -> EngineResult<Self> {
        if entities.is_empty() {
            return Err(EngineError::InvalidCatalog("catalog is empty".into()));
        }
        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for entity in &entities {
            entity.check()?;
            if !ids.insert(entity.id) {
                return Err(EngineError::InvalidCatalog(format!(
                    "duplicate identifier {}",
                    entity.id
                )));
            }
            if !names.insert(entity.name.trim().to_ascii_lowercase()) {
                return Err(EngineError::InvalidCatalog(format!(
                    "duplicate name {:?}",
                    entity.name
                )));
            }
        }
        entities.sort_by_key(|e| e.id);
        Ok(Self { entities })
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|idx| &self.entities[idx])
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        let needle = name.trim();
        self.entities
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(needle))
    }

    /// Smallest and largest generation present; the initial generation range.
    pub fn generation_span(&self) -> (u32, u32) {
        let low = self.entities.iter().map(|e| e.generation).min().unwrap_or(1);
        let high = self.entities.iter().map(|e| e.generation).max().unwrap_or(low);
        (low, high)
    }

    /// Entities that carry the same non-`None` trait in both slots.
    ///
    /// A non-empty result means the WRONG rule must not exclude a trait from
    /// the opposite slot for this catalog.
    pub fn repeated_trait_entities(&self) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|e| e.trait1 != Trait::None && e.trait1 == e.trait2)
            .collect()
    }

    pub fn allows_cross_slot_exclusion(&self) -> bool {
        self.repeated_trait_entities().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Entity> {
        vec![
            Entity::new(3, "Gamma", 2, Trait::Fire, Trait::Flying, Some(1.7), Some(90.5)),
            Entity::new(1, "Alpha", 1, Trait::Fire, Trait::None, Some(0.5), Some(9.0)),
            Entity::new(2, "Beta", 1, Trait::Water, Trait::None, Some(0.3), None),
        ]
    }

    #[test]
    fn catalog_sorts_by_identifier() {
        let catalog = Catalog::new(sample()).expect("catalog");
        let ids: Vec<_> = catalog.entities().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(catalog.get(2).map(|e| e.name.as_str()), Some("Beta"));
        assert!(catalog.get(9).is_none());
        assert_eq!(catalog.generation_span(), (1, 2));
    }

    #[test]
    fn catalog_rejects_duplicates() {
        let mut rows = sample();
        rows.push(Entity::new(1, "Delta", 1, Trait::Bug, Trait::None, None, None));
        assert!(matches!(
            Catalog::new(rows),
            Err(EngineError::InvalidCatalog(msg)) if msg.contains("identifier")
        ));

        let mut rows = sample();
        rows.push(Entity::new(7, "alpha", 1, Trait::Bug, Trait::None, None, None));
        assert!(matches!(
            Catalog::new(rows),
            Err(EngineError::InvalidCatalog(msg)) if msg.contains("name")
        ));
    }

    #[test]
    fn catalog_rejects_bad_attributes() {
        let rows = vec![Entity::new(1, "Zero", 0, Trait::Bug, Trait::None, None, None)];
        assert!(Catalog::new(rows).is_err());
        let rows = vec![Entity::new(1, "Neg", 1, Trait::Bug, Trait::None, Some(-1.0), None)];
        assert!(Catalog::new(rows).is_err());
        assert!(Catalog::new(Vec::new()).is_err());
    }

    #[test]
    fn name_lookup_is_case_insensitive() {
        let catalog = Catalog::new(sample()).expect("catalog");
        assert_eq!(catalog.find_by_name(" gamma ").map(|e| e.id), Some(3));
        assert!(catalog.find_by_name("omega").is_none());
    }

    #[test]
    fn trait_parsing_accepts_codes_and_blank() {
        assert_eq!("fire".parse::<Trait>().expect("parse"), Trait::Fire);
        assert_eq!("".parse::<Trait>().expect("parse"), Trait::None);
        assert!("plasma".parse::<Trait>().is_err());
        assert_eq!(Trait::from_code(6), Some(Trait::Fire));
        assert_eq!(Trait::Rock.code(), 18);
        assert_eq!(Trait::from_code(19), None);
    }

    #[test]
    fn trait_serde_uses_display_names() {
        let json = serde_json::to_string(&Trait::Flying).expect("serialize");
        assert_eq!(json, "\"Flying\"");
        let parsed: Trait = serde_json::from_str("\"dragon\"").expect("deserialize");
        assert_eq!(parsed, Trait::Dragon);
    }

    #[test]
    fn repeated_traits_are_reported() {
        let mut rows = sample();
        assert!(Catalog::new(rows.clone())
            .expect("catalog")
            .allows_cross_slot_exclusion());
        rows.push(Entity::new(4, "Twin", 3, Trait::Ice, Trait::Ice, None, None));
        let catalog = Catalog::new(rows).expect("catalog");
        let repeated: Vec<_> = catalog
            .repeated_trait_entities()
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(repeated, vec![4]);
        assert!(!catalog.allows_cross_slot_exclusion());
    }
}
