//! Search settings, loadable from a JSON file

use serde::{Deserialize, Serialize};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{error::Result, eval::Weights};

/// The default search depth in plies
pub const DEFAULT_DEPTH: u32 = 6;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum search depth in plies
    pub max_depth: u32,
    /// Heuristic weights, the defensive weights for the board's win length if unset
    pub weights: Option<Weights>,
    /// Deepen iteratively until this many milliseconds have passed
    pub time_budget_ms: Option<u64>,
    /// Search root moves on separate threads
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_DEPTH,
            weights: None,
            time_budget_ms: None,
            parallel: false,
        }
    }
}

impl SearchConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match &self.weights {
            Some(weights) => weights.validate(),
            None => Ok(()),
        }
    }
}
