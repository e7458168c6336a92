//! Configuration file support for Lift.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/lift/config.toml`.
//! Every engine operation takes the configuration by reference; nothing here
//! is global or mutable.

use crate::catalog::{self, to_owned_list};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub records: RecordsConfig,

    #[serde(default)]
    pub progression: ProgressionConfig,

    #[serde(default)]
    pub taxonomy: TaxonomyConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_journal_path")]
    pub journal_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            journal_path: default_journal_path(),
        }
    }
}

/// Personal record tracking configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordsConfig {
    /// Rep counts that get their own rep-max record
    #[serde(default = "default_tracked_rep_counts")]
    pub tracked_rep_counts: Vec<u32>,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            tracked_rep_counts: default_tracked_rep_counts(),
        }
    }
}

impl RecordsConfig {
    pub fn tracks(&self, reps: u32) -> bool {
        self.tracked_rep_counts.contains(&reps)
    }
}

/// Autoregulated progression parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// Most recent sessions scanned for RPE data
    #[serde(default = "default_rpe_window")]
    pub rpe_window: usize,

    /// Sessions that must share a max weight to count as a stall
    #[serde(default = "default_stall_window")]
    pub stall_window: usize,

    #[serde(default = "default_stall_rpe")]
    pub stall_rpe: f64,

    /// Upper bound of the "too easy" RPE band
    #[serde(default = "default_easy_rpe")]
    pub easy_rpe: f64,

    /// Upper bound of the "good" RPE band
    #[serde(default = "default_good_rpe")]
    pub good_rpe: f64,

    /// Upper bound of the "maintain" RPE band; anything above is a deload
    #[serde(default = "default_hard_rpe")]
    pub hard_rpe: f64,

    #[serde(default = "default_large_weight_step")]
    pub large_weight_step: f64,

    #[serde(default = "default_small_weight_step")]
    pub small_weight_step: f64,

    #[serde(default = "default_deload_step")]
    pub deload_step: f64,

    #[serde(default = "default_easy_rep_step")]
    pub easy_rep_step: u32,

    #[serde(default = "default_good_rep_step")]
    pub good_rep_step: u32,

    /// Rep range used when the target cannot be parsed
    #[serde(default = "default_rep_min")]
    pub default_rep_min: u32,

    #[serde(default = "default_rep_max")]
    pub default_rep_max: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            rpe_window: default_rpe_window(),
            stall_window: default_stall_window(),
            stall_rpe: default_stall_rpe(),
            easy_rpe: default_easy_rpe(),
            good_rpe: default_good_rpe(),
            hard_rpe: default_hard_rpe(),
            large_weight_step: default_large_weight_step(),
            small_weight_step: default_small_weight_step(),
            deload_step: default_deload_step(),
            easy_rep_step: default_easy_rep_step(),
            good_rep_step: default_good_rep_step(),
            default_rep_min: default_rep_min(),
            default_rep_max: default_rep_max(),
        }
    }
}

/// Muscle taxonomy and its training-balance partitions
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    #[serde(default = "default_muscle_groups")]
    pub muscle_groups: Vec<String>,

    #[serde(default = "default_push")]
    pub push: Vec<String>,

    #[serde(default = "default_pull")]
    pub pull: Vec<String>,

    #[serde(default = "default_upper")]
    pub upper: Vec<String>,

    #[serde(default = "default_lower")]
    pub lower: Vec<String>,

    /// Extra or overriding exercise → muscles entries
    #[serde(default)]
    pub exercises: BTreeMap<String, Vec<String>>,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            muscle_groups: default_muscle_groups(),
            push: default_push(),
            pull: default_pull(),
            upper: default_upper(),
            lower: default_lower(),
            exercises: BTreeMap::new(),
        }
    }
}

impl TaxonomyConfig {
    pub fn is_push(&self, muscle: &str) -> bool {
        contains_ignore_case(&self.push, muscle)
    }

    pub fn is_pull(&self, muscle: &str) -> bool {
        contains_ignore_case(&self.pull, muscle)
    }

    pub fn is_upper(&self, muscle: &str) -> bool {
        contains_ignore_case(&self.upper, muscle)
    }

    pub fn is_lower(&self, muscle: &str) -> bool {
        contains_ignore_case(&self.lower, muscle)
    }
}

fn contains_ignore_case(list: &[String], name: &str) -> bool {
    list.iter().any(|m| m.eq_ignore_ascii_case(name))
}

// Default value functions
fn default_journal_path() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("lift").join("journal.csv")
}

fn default_tracked_rep_counts() -> Vec<u32> {
    vec![1, 3, 5, 8, 10]
}

fn default_rpe_window() -> usize {
    3
}

fn default_stall_window() -> usize {
    4
}

fn default_stall_rpe() -> f64 {
    8.5
}

fn default_easy_rpe() -> f64 {
    6.5
}

fn default_good_rpe() -> f64 {
    7.5
}

fn default_hard_rpe() -> f64 {
    8.5
}

fn default_large_weight_step() -> f64 {
    5.0
}

fn default_small_weight_step() -> f64 {
    2.5
}

fn default_deload_step() -> f64 {
    5.0
}

fn default_easy_rep_step() -> u32 {
    2
}

fn default_good_rep_step() -> u32 {
    1
}

fn default_rep_min() -> u32 {
    1
}

fn default_rep_max() -> u32 {
    15
}

fn default_muscle_groups() -> Vec<String> {
    to_owned_list(catalog::MUSCLE_GROUPS)
}

fn default_push() -> Vec<String> {
    to_owned_list(catalog::PUSH_MUSCLES)
}

fn default_pull() -> Vec<String> {
    to_owned_list(catalog::PULL_MUSCLES)
}

fn default_upper() -> Vec<String> {
    to_owned_list(catalog::UPPER_MUSCLES)
}

fn default_lower() -> Vec<String> {
    to_owned_list(catalog::LOWER_MUSCLES)
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("lift").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject settings the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        let records = &self.records;
        if records.tracked_rep_counts.is_empty() {
            return Err(Error::Config("tracked_rep_counts must not be empty".into()));
        }
        if records.tracked_rep_counts.contains(&0) {
            return Err(Error::Config("tracked_rep_counts must be positive".into()));
        }

        let p = &self.progression;
        if p.rpe_window == 0 || p.stall_window == 0 {
            return Err(Error::Config(
                "rpe_window and stall_window must be at least 1".into(),
            ));
        }
        if !(p.easy_rpe < p.good_rpe && p.good_rpe < p.hard_rpe) {
            return Err(Error::Config(format!(
                "RPE thresholds must ascend (easy {} < good {} < hard {})",
                p.easy_rpe, p.good_rpe, p.hard_rpe
            )));
        }
        if p.default_rep_min == 0 || p.default_rep_min > p.default_rep_max {
            return Err(Error::Config(format!(
                "Invalid default rep range {}-{}",
                p.default_rep_min, p.default_rep_max
            )));
        }

        let known = &self.taxonomy.muscle_groups;
        let partitions = [
            &self.taxonomy.push,
            &self.taxonomy.pull,
            &self.taxonomy.upper,
            &self.taxonomy.lower,
        ];
        for muscle in partitions.into_iter().flatten() {
            if !contains_ignore_case(known, muscle) {
                return Err(Error::Config(format!(
                    "Partition references unknown muscle group '{}'",
                    muscle
                )));
            }
        }

        let errors = crate::MuscleMap::from_config(self).validate(known);
        if !errors.is_empty() {
            return Err(Error::Config(errors.join("; ")));
        }

        Ok(())
    }
}
