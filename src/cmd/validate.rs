use crate::reports::{self, ValidationRow};
use clap::Args;
use groupforge::config::Config;
use groupforge::optimizer::runner::CohortJob;
use groupforge::optimizer::GroupOptimizer;
use tracing::{error, info};

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: Config,
}

/// Checks that every cohort can be optimized without running any trials.
pub fn run(jobs: &[CohortJob]) -> bool {
    info!("🔎 Validating {} cohort(s)", jobs.len());

    let mut rows = Vec::new();
    let mut all_ok = true;

    for job in jobs {
        match GroupOptimizer::for_matrix(job.relationships.clone(), job.group_count) {
            Ok(optimizer) => {
                rows.push(ValidationRow {
                    cohort: job.name.clone(),
                    individuals: job.relationships.len(),
                    pairs: job.relationships.pair_count(),
                    capacities: optimizer.capacities().to_vec(),
                    warnings: optimizer.warnings().len(),
                });
            }
            Err(e) => {
                error!("❌ [{}] {}", job.name, e);
                all_ok = false;
            }
        }
    }

    reports::print_validation_report(&rows);
    all_ok
}
