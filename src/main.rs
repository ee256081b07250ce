use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use groupforge::config::SearchParams;
use groupforge::error::{GfResult, GroupForgeError};
use groupforge::loader;
use groupforge::optimizer::runner::CohortJob;
use std::path::Path;
use std::process;
use std::sync::Arc;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Square relationship matrix CSV; repeat for several cohorts
    #[arg(global = true, short, long)]
    matrix: Vec<String>,

    /// Roster CSV (one name per row), used with --pairs
    #[arg(global = true, short, long)]
    roster: Option<String>,

    /// Pair score CSV (name_a,name_b,score), used with --roster
    #[arg(global = true, short, long)]
    pairs: Option<String>,

    /// JSON file with search parameters; explicit flags take precedence
    #[arg(global = true, short, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Optimize(cmd::optimize::OptimizeArgs),
    Validate(cmd::validate::ValidateArgs),
}

fn cohort_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

fn load_jobs(cli: &Cli, group_count: usize) -> GfResult<Vec<CohortJob>> {
    if !cli.matrix.is_empty() {
        if cli.roster.is_some() || cli.pairs.is_some() {
            return Err(GroupForgeError::Config(
                "Use either --matrix or --roster/--pairs, not both".to_string(),
            ));
        }
        return cli
            .matrix
            .iter()
            .map(|path| -> GfResult<CohortJob> {
                info!("📂 Loading Matrix: {}", path);
                Ok(CohortJob {
                    name: cohort_name(path),
                    relationships: Arc::new(loader::load_matrix_csv(path)?),
                    group_count,
                })
            })
            .collect();
    }

    match (&cli.roster, &cli.pairs) {
        (Some(roster_path), Some(pairs_path)) => {
            info!("📂 Loading Roster: {}", roster_path);
            let roster = loader::load_roster(roster_path)?;
            info!("📂 Loading Pairs: {}", pairs_path);
            let matrix = loader::load_pairs_csv(pairs_path, &roster)?;
            Ok(vec![CohortJob {
                name: cohort_name(roster_path),
                relationships: Arc::new(matrix),
                group_count,
            }])
        }
        _ => Err(GroupForgeError::Config(
            "Provide --matrix FILE, or both --roster FILE and --pairs FILE".to_string(),
        )),
    }
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let (cli_params, sub_name) = match &cli.command {
        Commands::Optimize(args) => (&args.config.search, "optimize"),
        Commands::Validate(args) => (&args.config.search, "validate"),
    };

    let params = match &cli.config {
        Some(path) => {
            info!("⚖️  Loading Search Parameters from: {}", path);
            let mut file_params = SearchParams::load_from_file(path).unwrap_or_else(|e| {
                error!("❌ {}", e);
                process::exit(1);
            });
            if let Some(sub_matches) = matches.subcommand_matches(sub_name) {
                file_params.merge_from_cli(cli_params, sub_matches);
            }
            file_params
        }
        None => cli_params.clone(),
    };

    let checked = match &cli.command {
        Commands::Optimize(_) => params.validate(),
        Commands::Validate(_) => params.validate_groups(),
    };
    if let Err(e) = checked {
        error!("❌ {}", e);
        process::exit(1);
    }

    let jobs = load_jobs(&cli, params.groups).unwrap_or_else(|e| {
        error!("❌ FATAL ERROR LOADING INPUT: {}", e);
        process::exit(1);
    });

    let ok = match &cli.command {
        Commands::Optimize(args) => cmd::optimize::run(args, &params, &jobs),
        Commands::Validate(_) => cmd::validate::run(&jobs),
    };

    if !ok {
        process::exit(1);
    }
}
