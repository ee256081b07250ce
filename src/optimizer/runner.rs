use crate::acceptance::Proposal;
use crate::config::SearchParams;
use crate::error::GfResult;
use crate::optimizer::{GroupOptimizer, OptimizerWarning};
use crate::partition::assign::AssignmentStrategy;
use crate::relationships::RelationshipMatrix;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

pub struct RunOptions {
    pub trials: usize,
    pub seed: Option<u64>,
    pub strategy: AssignmentStrategy,
}

impl From<&SearchParams> for RunOptions {
    fn from(params: &SearchParams) -> Self {
        Self {
            trials: params.trials,
            seed: params.seed,
            strategy: params.strategy,
        }
    }
}

/// One independent optimization request, e.g. a single class or cohort.
#[derive(Clone)]
pub struct CohortJob {
    pub name: String,
    pub relationships: Arc<RelationshipMatrix>,
    pub group_count: usize,
}

pub struct CohortResult {
    pub name: String,
    pub proposal: Proposal,
    pub capacities: Vec<usize>,
    pub warnings: Vec<OptimizerWarning>,
}

/// Runs one optimizer for `job`. With a base seed, job `index` uses
/// `seed + index` so a batch is reproducible.
pub fn optimize_cohort(job: &CohortJob, options: &RunOptions, index: usize) -> GfResult<CohortResult> {
    let mut optimizer = GroupOptimizer::for_matrix(job.relationships.clone(), job.group_count)?
        .with_strategy(options.strategy);
    if let Some(seed) = options.seed {
        optimizer = optimizer.with_seed(seed.wrapping_add(index as u64));
    }

    optimizer.run(options.trials)?;

    Ok(CohortResult {
        name: job.name.clone(),
        proposal: optimizer.propose()?,
        capacities: optimizer.capacities().to_vec(),
        warnings: optimizer.warnings().to_vec(),
    })
}

/// Optimizes every job in parallel. Results come back in job order; a
/// failing job does not affect the others.
pub fn optimize_cohorts(jobs: &[CohortJob], options: &RunOptions) -> Vec<GfResult<CohortResult>> {
    let start = Instant::now();

    let results: Vec<GfResult<CohortResult>> = jobs
        .par_iter()
        .enumerate()
        .map(|(i, job)| optimize_cohort(job, options, i))
        .collect();

    info!(
        "Optimized {} cohort(s) x {} trials in {:.2}s",
        jobs.len(),
        options.trials,
        start.elapsed().as_secs_f32()
    );

    results
}
