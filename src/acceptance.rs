use crate::error::{GfResult, GroupForgeError};
use crate::partition::Partition;
use crate::relationships::{RelationshipMatrix, Score};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A proposed grouping, detached from the optimizer that produced it.
/// Carried between the "propose" and "accept" steps by the caller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Proposal {
    /// Member names per group (display view).
    pub groups: Vec<Vec<String>>,
    /// Member slot indices per group (persistence view).
    pub slots: Vec<Vec<usize>>,
    pub score: Score,
    pub trials: usize,
}

impl Proposal {
    pub fn from_partition(
        partition: &Partition,
        relationships: &RelationshipMatrix,
        trials: usize,
    ) -> GfResult<Self> {
        let score = match partition.score() {
            Some(s) => s,
            None => partition.compute_score(relationships)?,
        };
        Ok(Self {
            groups: partition.names(),
            slots: partition.slots(),
            score,
            trials,
        })
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Every unordered within-group pair of slots, lower slot first.
    pub fn within_group_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for group in &self.slots {
            for (i, &a) in group.iter().enumerate() {
                for &b in &group[i + 1..] {
                    pairs.push((a.min(b), a.max(b)));
                }
            }
        }
        pairs
    }
}

/// External persistence layer notified when a proposal is accepted.
pub trait AcceptanceSink {
    fn record_accepted(&mut self, proposal: &Proposal) -> GfResult<()>;
}

/// Hands an accepted proposal to `sink`. This is the only step with side
/// effects, and those belong to the sink.
pub fn accept<S: AcceptanceSink + ?Sized>(proposal: &Proposal, sink: &mut S) -> GfResult<()> {
    if proposal.groups.len() != proposal.slots.len() {
        return Err(GroupForgeError::Data(format!(
            "Proposal has {} name groups but {} slot groups",
            proposal.groups.len(),
            proposal.slots.len()
        )));
    }
    sink.record_accepted(proposal)?;
    info!(
        "Accepted grouping with score {:.3} ({} groups)",
        proposal.score,
        proposal.group_count()
    );
    Ok(())
}
