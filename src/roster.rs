use crate::error::{GfResult, GroupForgeError};
use std::collections::HashMap;

/// One person to be grouped. `slot` indexes into the relationship matrix
/// and never changes during a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Individual {
    pub name: String,
    pub slot: usize,
}

/// The fixed, ordered set of individuals for one optimization run.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    members: Vec<Individual>,
    by_name: HashMap<String, usize>,
}

impl Roster {
    /// Assigns slots in input order. Names are trimmed; blank or duplicate
    /// names are rejected.
    pub fn new<I, S>(names: I) -> GfResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut members = Vec::new();
        let mut by_name = HashMap::new();

        for raw in names {
            let name = raw.as_ref().trim();
            if name.is_empty() {
                return Err(GroupForgeError::Data(format!(
                    "Roster entry #{} has an empty name",
                    members.len() + 1
                )));
            }
            let slot = members.len();
            if by_name.insert(name.to_string(), slot).is_some() {
                return Err(GroupForgeError::Data(format!(
                    "Duplicate name '{}' in roster",
                    name
                )));
            }
            members.push(Individual {
                name: name.to_string(),
                slot,
            });
        }

        Ok(Self { members, by_name })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
        self.members.iter()
    }

    pub fn get(&self, slot: usize) -> Option<&Individual> {
        self.members.get(slot)
    }

    pub fn slot_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name.trim()).copied()
    }

    /// Like `slot_of`, but an unknown name is a `DataError`.
    pub fn require_slot(&self, name: &str) -> GfResult<usize> {
        self.slot_of(name).ok_or_else(|| {
            GroupForgeError::Data(format!("'{}' is not part of the roster", name.trim()))
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.name.as_str())
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Individual;
    type IntoIter = std::slice::Iter<'a, Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
