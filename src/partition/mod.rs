pub mod assign;

use crate::error::{GfResult, GroupForgeError};
use crate::relationships::{RelationshipMatrix, Score};
use crate::roster::{Individual, Roster};

/// Splits `num_individuals` into `group_count` capacities, left to right,
/// so that any two capacities differ by at most one. Earlier groups absorb
/// the remainder. Groups beyond the roster size get capacity 0.
pub fn group_capacities(num_individuals: usize, group_count: usize) -> GfResult<Vec<usize>> {
    if group_count < 1 {
        return Err(GroupForgeError::Config(
            "Group count must be at least 1".to_string(),
        ));
    }

    let mut remaining = num_individuals;
    let mut capacities = Vec::with_capacity(group_count);

    for i in 0..group_count {
        let remaining_groups = group_count - i;
        let mut size = remaining / remaining_groups;
        if remaining % remaining_groups > 0 {
            size += 1;
        }
        remaining -= size;
        capacities.push(size);
    }

    Ok(capacities)
}

/// Bounded collection of individuals.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    capacity: usize,
    members: Vec<Individual>,
}

impl Group {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            members: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn members(&self) -> &[Individual] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    /// Returns `false` (and leaves the group untouched) when full.
    pub fn try_add(&mut self, individual: Individual) -> bool {
        if self.is_full() {
            return false;
        }
        self.members.push(individual);
        true
    }

    /// Sum over every unordered pair of members. Groups with fewer than two
    /// members contribute 0.
    pub fn score(&self, relationships: &RelationshipMatrix) -> GfResult<Score> {
        let mut total = 0.0;
        for (i, a) in self.members.iter().enumerate() {
            for b in &self.members[i + 1..] {
                total += relationships.get(a.slot, b.slot)?;
            }
        }
        Ok(total)
    }

    pub fn names(&self) -> Vec<String> {
        self.members.iter().map(|m| m.name.clone()).collect()
    }

    pub fn slots(&self) -> Vec<usize> {
        self.members.iter().map(|m| m.slot).collect()
    }
}

/// A (possibly partial) assignment of individuals into a fixed number of
/// groups. The score is cached once computed and dropped on any change.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    groups: Vec<Group>,
    score: Option<Score>,
}

impl Partition {
    pub fn with_capacities(capacities: &[usize]) -> Self {
        Self {
            groups: capacities.iter().map(|&c| Group::new(c)).collect(),
            score: None,
        }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn member_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    pub fn capacities(&self) -> Vec<usize> {
        self.groups.iter().map(Group::capacity).collect()
    }

    /// Attempts to place `individual` into group `group_index`. Out of range
    /// indices and full groups both report `false`.
    pub fn try_assign(&mut self, group_index: usize, individual: Individual) -> bool {
        match self.groups.get_mut(group_index) {
            Some(group) => {
                let added = group.try_add(individual);
                if added {
                    self.score = None;
                }
                added
            }
            None => false,
        }
    }

    /// Cached score, if `evaluate` has run since the last change.
    pub fn score(&self) -> Option<Score> {
        self.score
    }

    /// Computes the within-group pair score without touching the cache.
    pub fn compute_score(&self, relationships: &RelationshipMatrix) -> GfResult<Score> {
        let mut total = 0.0;
        for group in &self.groups {
            total += group.score(relationships)?;
        }
        Ok(total)
    }

    pub fn evaluate(&mut self, relationships: &RelationshipMatrix) -> GfResult<Score> {
        if let Some(s) = self.score {
            return Ok(s);
        }
        let s = self.compute_score(relationships)?;
        self.score = Some(s);
        Ok(s)
    }

    /// Checks that no group is over capacity and that every roster member
    /// appears exactly once.
    pub fn verify(&self, roster: &Roster) -> GfResult<()> {
        for (i, group) in self.groups.iter().enumerate() {
            if group.len() > group.capacity() {
                return Err(GroupForgeError::Capacity(format!(
                    "Group {} holds {} members but has capacity {}",
                    i + 1,
                    group.len(),
                    group.capacity()
                )));
            }
        }

        let mut seen = vec![false; roster.len()];
        for member in self.groups.iter().flat_map(|g| g.members.iter()) {
            match seen.get_mut(member.slot) {
                Some(flag) if !*flag => *flag = true,
                Some(_) => {
                    return Err(GroupForgeError::Capacity(format!(
                        "'{}' was assigned more than once",
                        member.name
                    )));
                }
                None => {
                    return Err(GroupForgeError::Capacity(format!(
                        "'{}' (slot {}) is not part of the roster",
                        member.name, member.slot
                    )));
                }
            }
        }

        if let Some(slot) = seen.iter().position(|&s| !s) {
            let name = roster.get(slot).map(|i| i.name.as_str()).unwrap_or("?");
            return Err(GroupForgeError::Capacity(format!(
                "'{}' was never assigned to a group",
                name
            )));
        }

        Ok(())
    }

    /// Member names per group, in group order.
    pub fn names(&self) -> Vec<Vec<String>> {
        self.groups.iter().map(Group::names).collect()
    }

    /// Member slot indices per group, in group order.
    pub fn slots(&self) -> Vec<Vec<usize>> {
        self.groups.iter().map(Group::slots).collect()
    }
}
