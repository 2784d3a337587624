use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_DECIMALS: usize = 2;
pub const DEFAULT_PASSING_SCORE: f64 = 6.0;
pub const MAX_DECIMALS: usize = 6;

/// User configuration.
///
/// Example YAML:
/// ```yaml
/// data_file: ~/grades/fall.json
/// decimals: 1
/// passing_score: 5
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Where the gradebook state lives (default: next to the config file)
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Digits shown after the decimal point (default: 2)
    #[serde(default)]
    pub decimals: Option<usize>,

    /// Final score (0-10) at or above which the result is shown as passing
    #[serde(default)]
    pub passing_score: Option<f64>,
}

impl Config {
    pub fn decimals(&self) -> usize {
        self.decimals.unwrap_or(DEFAULT_DECIMALS)
    }

    pub fn passing_score(&self) -> f64 {
        self.passing_score.unwrap_or(DEFAULT_PASSING_SCORE)
    }
}
