pub mod runner;

use crate::acceptance::Proposal;
use crate::error::{GfResult, GroupForgeError};
use crate::partition::assign::{build_random_partition, AssignmentStrategy};
use crate::partition::{group_capacities, Partition};
use crate::relationships::{RelationshipMatrix, Score};
use crate::roster::Roster;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Non-fatal conditions detected while setting up an optimizer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptimizerWarning {
    #[error(
        "Group count {groups} exceeds roster size {individuals}; {empty_groups} group(s) will stay empty"
    )]
    MoreGroupsThanIndividuals {
        groups: usize,
        individuals: usize,
        empty_groups: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerState {
    /// Constructed, no trial has completed yet.
    Idle,
    /// At least one trial completed; a best partition is held.
    Converged,
}

/// Receives every strict improvement of the best score during `run`.
pub trait ProgressCallback {
    fn on_improvement(&self, trial: usize, score: Score);
}

impl<F: Fn(usize, Score)> ProgressCallback for F {
    fn on_improvement(&self, trial: usize, score: Score) {
        self(trial, score)
    }
}

pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_improvement(&self, _trial: usize, _score: Score) {}
}

/// Best-of-N random search over balanced partitions of one roster.
pub struct GroupOptimizer {
    roster: Roster,
    relationships: Arc<RelationshipMatrix>,
    group_count: usize,
    capacities: Vec<usize>,
    strategy: AssignmentStrategy,
    rng: fastrand::Rng,
    best: Option<Partition>,
    trials_run: usize,
    warnings: Vec<OptimizerWarning>,
}

impl GroupOptimizer {
    pub fn new(
        roster: Roster,
        relationships: Arc<RelationshipMatrix>,
        group_count: usize,
    ) -> GfResult<Self> {
        let capacities = group_capacities(roster.len(), group_count)?;

        if !roster.names().eq(relationships.roster().names()) {
            return Err(GroupForgeError::Data(format!(
                "Roster ({} individuals) does not match the relationship matrix ({} individuals)",
                roster.len(),
                relationships.len()
            )));
        }

        let mut warnings = Vec::new();
        if group_count > roster.len() {
            let w = OptimizerWarning::MoreGroupsThanIndividuals {
                groups: group_count,
                individuals: roster.len(),
                empty_groups: capacities.iter().filter(|&&c| c == 0).count(),
            };
            warn!("⚠️  {}", w);
            warnings.push(w);
        }

        Ok(Self {
            roster,
            relationships,
            group_count,
            capacities,
            strategy: AssignmentStrategy::default(),
            rng: fastrand::Rng::new(),
            best: None,
            trials_run: 0,
            warnings,
        })
    }

    /// Uses the matrix's own roster.
    pub fn for_matrix(relationships: Arc<RelationshipMatrix>, group_count: usize) -> GfResult<Self> {
        let roster = relationships.roster().clone();
        Self::new(roster, relationships, group_count)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    pub fn with_strategy(mut self, strategy: AssignmentStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }

    pub fn capacities(&self) -> &[usize] {
        &self.capacities
    }

    pub fn strategy(&self) -> AssignmentStrategy {
        self.strategy
    }

    pub fn warnings(&self) -> &[OptimizerWarning] {
        &self.warnings
    }

    pub fn trials_run(&self) -> usize {
        self.trials_run
    }

    pub fn state(&self) -> OptimizerState {
        if self.best.is_some() {
            OptimizerState::Converged
        } else {
            OptimizerState::Idle
        }
    }

    pub fn best_partition(&self) -> Option<&Partition> {
        self.best.as_ref()
    }

    pub fn best_score(&self) -> Option<Score> {
        self.best.as_ref().and_then(Partition::score)
    }

    pub fn best_names(&self) -> Option<Vec<Vec<String>>> {
        self.best.as_ref().map(Partition::names)
    }

    pub fn best_slots(&self) -> Option<Vec<Vec<usize>>> {
        self.best.as_ref().map(Partition::slots)
    }

    pub fn run(&mut self, trials: usize) -> GfResult<&Partition> {
        self.run_with_progress(trials, &NoProgress)
    }

    /// Runs `trials` more trials. A trial replaces the held best partition
    /// only when its score is strictly lower, so ties keep the earlier one.
    pub fn run_with_progress<CB: ProgressCallback + ?Sized>(
        &mut self,
        trials: usize,
        callback: &CB,
    ) -> GfResult<&Partition> {
        if trials < 1 {
            return Err(GroupForgeError::Config(
                "Trial count must be at least 1".to_string(),
            ));
        }

        let start_score = self.best_score();

        for _ in 0..trials {
            let mut candidate = build_random_partition(
                &mut self.rng,
                &self.roster,
                &self.capacities,
                self.strategy,
            )?;
            let score = candidate.evaluate(&self.relationships)?;
            self.trials_run += 1;

            let improved = match self.best_score() {
                None => true,
                Some(best) => beats(score, best),
            };

            if improved {
                debug!("Trial {}: new best score {:.3}", self.trials_run, score);
                callback.on_improvement(self.trials_run, score);
                self.best = Some(candidate);
            }
        }

        info!(
            "Ran {} trial(s) ({} total). Best: {:.3} (was {})",
            trials,
            self.trials_run,
            self.best_score().unwrap_or(0.0),
            start_score.map_or_else(|| "none".to_string(), |s| format!("{:.3}", s)),
        );

        self.best.as_ref().ok_or_else(|| {
            GroupForgeError::Capacity("No partition retained after running trials".to_string())
        })
    }

    /// Snapshot of the held best partition for display or acceptance.
    pub fn propose(&self) -> GfResult<Proposal> {
        let best = self.best.as_ref().ok_or_else(|| {
            GroupForgeError::Config("Nothing to propose: no trials have been run".to_string())
        })?;
        Proposal::from_partition(best, &self.relationships, self.trials_run)
    }
}

/// Strict improvement. A NaN total (opposite overflows in different
/// groups) never wins and is replaced by any comparable score.
fn beats(score: Score, best: Score) -> bool {
    if score.is_nan() {
        false
    } else if best.is_nan() {
        true
    } else {
        score < best
    }
}
