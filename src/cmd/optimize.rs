use crate::reports;
use clap::Args;
use groupforge::acceptance::Proposal;
use groupforge::config::{Config, SearchParams};
use groupforge::optimizer::runner::{optimize_cohorts, CohortJob, RunOptions};
use serde::Serialize;
use tracing::{error, info};

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub config: Config,

    /// Print proposals as JSON on stdout instead of tables
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Serialize)]
struct CohortReport<'a> {
    cohort: &'a str,
    capacities: &'a [usize],
    warnings: Vec<String>,
    proposal: &'a Proposal,
}

/// Returns `false` when any cohort failed.
pub fn run(args: &OptimizeArgs, params: &SearchParams, jobs: &[CohortJob]) -> bool {
    let options = RunOptions::from(params);
    info!(
        "🔥 Optimizing {} cohort(s): {} groups, {} trials, strategy {}",
        jobs.len(),
        params.groups,
        options.trials,
        options.strategy
    );

    let results = optimize_cohorts(jobs, &options);
    let mut all_ok = true;
    let mut summaries = Vec::new();

    for (job, result) in jobs.iter().zip(&results) {
        match result {
            Ok(r) => {
                summaries.push(CohortReport {
                    cohort: &r.name,
                    capacities: &r.capacities,
                    warnings: r.warnings.iter().map(|w| w.to_string()).collect(),
                    proposal: &r.proposal,
                });
            }
            Err(e) => {
                error!("❌ [{}] {}", job.name, e);
                all_ok = false;
            }
        }
    }

    if args.json {
        match serde_json::to_string_pretty(&summaries) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                error!("❌ Failed to serialize proposals: {}", e);
                return false;
            }
        }
    } else {
        for r in &summaries {
            reports::print_proposal(r.cohort, r.proposal);
            println!("Score: {:.2}", r.proposal.score);
        }
        if summaries.len() > 1 {
            let rows: Vec<(&str, &Proposal)> =
                summaries.iter().map(|r| (r.cohort, r.proposal)).collect();
            reports::print_summary(&rows);
        }
    }

    all_ok
}
