use crate::error::{GfResult, GroupForgeError};
use crate::partition::assign::AssignmentStrategy;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Number of groups to split each roster into
    #[arg(short = 'g', long, default_value_t = 2)]
    pub groups: usize,

    /// Random partitions to try; the lowest score wins
    #[arg(short = 't', long, default_value_t = 1000)]
    pub trials: usize,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = AssignmentStrategy::Rejection)]
    pub strategy: AssignmentStrategy,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            groups: 2,
            trials: 1000,
            seed: None,
            strategy: AssignmentStrategy::Rejection,
        }
    }
}

impl SearchParams {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overrides fields with CLI values, but only those the user actually
    /// typed; clap defaults never clobber file values.
    pub fn merge_from_cli(&mut self, cli: &SearchParams, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(groups, "groups");
        update_if_present!(trials, "trials");
        update_if_present!(seed, "seed");
        update_if_present!(strategy, "strategy");
    }

    /// Checks only what sizing needs; `validate` runs no trials.
    pub fn validate_groups(&self) -> GfResult<()> {
        if self.groups < 1 {
            return Err(GroupForgeError::Config(
                "--groups must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate(&self) -> GfResult<()> {
        self.validate_groups()?;
        if self.trials < 1 {
            return Err(GroupForgeError::Config(
                "--trials must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, FromArgMatches, Parser};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Parser, Debug)]
    struct Harness {
        #[command(flatten)]
        config: Config,
    }

    #[test]
    fn defaults_match_cli_defaults() {
        let parsed = Harness::try_parse_from(["test"]).unwrap();
        assert_eq!(parsed.config.search, SearchParams::default());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "groups": 4, "strategy": "slot_shuffle" }}"#).unwrap();
        let params = SearchParams::load_from_file(file.path()).unwrap();
        assert_eq!(params.groups, 4);
        assert_eq!(params.trials, 1000);
        assert_eq!(params.strategy, AssignmentStrategy::SlotShuffle);
    }

    #[test]
    fn malformed_json_is_reported() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ groups: ").unwrap();
        assert!(matches!(
            SearchParams::load_from_file(file.path()),
            Err(GroupForgeError::Json(_))
        ));
    }

    #[test]
    fn only_typed_flags_override_file_values() {
        let matches = Harness::command()
            .try_get_matches_from(["test", "--trials", "25"])
            .unwrap();
        let cli = Harness::from_arg_matches(&matches).unwrap();

        let mut from_file = SearchParams {
            groups: 6,
            trials: 10,
            seed: Some(3),
            strategy: AssignmentStrategy::SlotShuffle,
        };
        from_file.merge_from_cli(&cli.config.search, &matches);

        assert_eq!(from_file.trials, 25);
        assert_eq!(from_file.groups, 6);
        assert_eq!(from_file.seed, Some(3));
        assert_eq!(from_file.strategy, AssignmentStrategy::SlotShuffle);
    }

    #[test]
    fn validation_rejects_zero_counts() {
        let mut params = SearchParams::default();
        params.trials = 0;
        assert!(params.validate().unwrap_err().is_config());
        params.trials = 1;
        params.groups = 0;
        assert!(params.validate().unwrap_err().is_config());
    }

    #[test]
    fn group_check_ignores_trials() {
        let mut params = SearchParams::default();
        params.trials = 0;
        assert!(params.validate_groups().is_ok());
        params.groups = 0;
        assert!(params.validate_groups().unwrap_err().is_config());
    }
}
