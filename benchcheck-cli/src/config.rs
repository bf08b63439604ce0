//! Configuration loading from benchcheck.toml
//!
//! BenchCheck configuration can be specified in a `benchcheck.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.

use benchcheck_core::{
    ConsistencyPolicy, DEFAULT_EFFICIENCY_TOLERANCE, DEFAULT_THROUGHPUT_LATENCY_TOLERANCE,
    LoadMode, PhysicalLimits, PlausibilityRanges, PlausibleRange,
};
use benchcheck_logic::{AssessmentThresholds, ValidationRequest, ValidatorOptions};
use benchcheck_stats::{DEFAULT_ALPHA, DEFAULT_CONFIDENCE_LEVEL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name searched for by [`BenchCheckConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "benchcheck.toml";

/// BenchCheck configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BenchCheckConfig {
    /// Validation settings
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Ingestion limits and plausibility ranges
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Power computations run on every validation
    #[serde(default)]
    pub power: PowerConfig,
    /// Assessment grade cut-offs
    #[serde(default)]
    pub assessment: AssessmentThresholds,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
}

/// Validation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Confidence level (e.g., 0.95 for 95%)
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
    /// Relative tolerance for `efficiency == throughput / power`
    #[serde(default = "default_efficiency_tolerance")]
    pub efficiency_tolerance: f64,
    /// Abort on the first invalid row instead of rejecting it
    #[serde(default)]
    pub strict: bool,
    /// Also require `throughput ≈ batch_size / latency`
    #[serde(default)]
    pub check_throughput_latency: bool,
    /// Relative tolerance for the throughput/latency check
    #[serde(default = "default_throughput_latency_tolerance")]
    pub throughput_latency_tolerance: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            confidence_level: default_confidence_level(),
            efficiency_tolerance: default_efficiency_tolerance(),
            strict: false,
            check_throughput_latency: false,
            throughput_latency_tolerance: default_throughput_latency_tolerance(),
        }
    }
}

fn default_confidence_level() -> f64 {
    DEFAULT_CONFIDENCE_LEVEL
}
fn default_efficiency_tolerance() -> f64 {
    DEFAULT_EFFICIENCY_TOLERANCE
}
fn default_throughput_latency_tolerance() -> f64 {
    DEFAULT_THROUGHPUT_LATENCY_TOLERANCE
}

/// Ingestion limits and plausibility ranges
///
/// `temperature_min`/`temperature_max` reject a record at ingestion. The
/// remaining ranges only score the physical-validity and range-validation
/// categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Lowest accepted temperature (°C)
    #[serde(default = "default_temperature_min")]
    pub temperature_min: f64,
    /// Highest accepted temperature (°C)
    #[serde(default = "default_temperature_max")]
    pub temperature_max: f64,
    /// Plausible latency range (ms)
    #[serde(default = "default_latency_min")]
    pub latency_min: f64,
    #[serde(default = "default_latency_max")]
    /// Upper end of the latency range
    pub latency_max: f64,
    /// Plausible throughput range (fps)
    #[serde(default = "default_throughput_min")]
    pub throughput_min: f64,
    #[serde(default = "default_throughput_max")]
    /// Upper end of the throughput range
    pub throughput_max: f64,
    /// Plausible power range (W)
    #[serde(default = "default_power_min")]
    pub power_min: f64,
    #[serde(default = "default_power_max")]
    /// Upper end of the power range
    pub power_max: f64,
    /// Plausible operating temperature range (°C)
    #[serde(default = "default_plausible_temperature_min")]
    pub plausible_temperature_min: f64,
    #[serde(default = "default_plausible_temperature_max")]
    /// Upper end of the operating temperature range
    pub plausible_temperature_max: f64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            temperature_min: default_temperature_min(),
            temperature_max: default_temperature_max(),
            latency_min: default_latency_min(),
            latency_max: default_latency_max(),
            throughput_min: default_throughput_min(),
            throughput_max: default_throughput_max(),
            power_min: default_power_min(),
            power_max: default_power_max(),
            plausible_temperature_min: default_plausible_temperature_min(),
            plausible_temperature_max: default_plausible_temperature_max(),
        }
    }
}

impl LimitsConfig {
    /// Hard ingestion limits
    pub fn physical(&self) -> PhysicalLimits {
        PhysicalLimits {
            temperature_min_c: self.temperature_min,
            temperature_max_c: self.temperature_max,
        }
    }

    /// Ranges scored per check category
    pub fn plausibility(&self) -> PlausibilityRanges {
        PlausibilityRanges {
            latency_ms: PlausibleRange::new(self.latency_min, self.latency_max),
            throughput_fps: PlausibleRange::new(self.throughput_min, self.throughput_max),
            power_w: PlausibleRange::new(self.power_min, self.power_max),
            temperature_c: PlausibleRange::new(
                self.plausible_temperature_min,
                self.plausible_temperature_max,
            ),
        }
    }
}

fn default_temperature_min() -> f64 {
    PhysicalLimits::default().temperature_min_c
}
fn default_temperature_max() -> f64 {
    PhysicalLimits::default().temperature_max_c
}
fn default_latency_min() -> f64 {
    PlausibilityRanges::default().latency_ms.min
}
fn default_latency_max() -> f64 {
    PlausibilityRanges::default().latency_ms.max
}
fn default_throughput_min() -> f64 {
    PlausibilityRanges::default().throughput_fps.min
}
fn default_throughput_max() -> f64 {
    PlausibilityRanges::default().throughput_fps.max
}
fn default_power_min() -> f64 {
    PlausibilityRanges::default().power_w.min
}
fn default_power_max() -> f64 {
    PlausibilityRanges::default().power_w.max
}
fn default_plausible_temperature_min() -> f64 {
    PlausibilityRanges::default().temperature_c.min
}
fn default_plausible_temperature_max() -> f64 {
    PlausibilityRanges::default().temperature_c.max
}

/// Power computations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerConfig {
    /// Significance level
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Two-sided tests
    #[serde(default = "default_two_sided")]
    pub two_sided: bool,
    /// Effect sizes crossed with `sample_sizes`
    #[serde(default)]
    pub effect_sizes: Vec<f64>,
    /// Sample sizes crossed with `effect_sizes`
    #[serde(default)]
    pub sample_sizes: Vec<usize>,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            two_sided: default_two_sided(),
            effect_sizes: Vec::new(),
            sample_sizes: Vec::new(),
        }
    }
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}
fn default_two_sided() -> bool {
    true
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human" or "json"
    #[serde(default = "default_format")]
    pub format: String,
    /// Directory that relative `--output` paths are written into
    #[serde(default = "default_output_dir")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            directory: default_output_dir(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}
fn default_output_dir() -> String {
    ".".to_string()
}

impl OutputConfig {
    /// Resolve an output path against the configured directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            Path::new(&self.directory).join(path)
        }
    }
}

/// Runner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Threads for parallel checks and estimation; 0 = all cores
    #[serde(default)]
    pub threads: usize,
}

impl BenchCheckConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let dir = std::env::current_dir().ok()?;
        Self::discover_from(dir)
    }

    /// Walk up from `dir` looking for `benchcheck.toml`
    pub fn discover_from(mut dir: PathBuf) -> Option<Self> {
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some(config),
                    Err(err) => {
                        tracing::warn!(
                            path = %config_path.display(),
                            error = %err,
                            "ignoring unreadable config, using defaults"
                        );
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Validator settings described by this configuration
    pub fn validator_options(&self) -> ValidatorOptions {
        ValidatorOptions {
            confidence_level: self.validation.confidence_level,
            load_mode: if self.validation.strict {
                LoadMode::Strict
            } else {
                LoadMode::Lenient
            },
            policy: ConsistencyPolicy {
                efficiency_tolerance: self.validation.efficiency_tolerance,
                limits: self.limits.physical(),
                check_throughput_latency: self.validation.check_throughput_latency,
                throughput_latency_tolerance: self.validation.throughput_latency_tolerance,
                plausibility: self.limits.plausibility(),
            },
            thresholds: self.assessment.clone(),
            alpha: self.power.alpha,
            two_sided: self.power.two_sided,
            parallel: self.runner.threads != 1,
        }
    }

    /// Power computations requested by this configuration
    pub fn request(&self) -> ValidationRequest {
        ValidationRequest::default().power_grid(&self.power.effect_sizes, &self.power.sample_sizes)
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# BenchCheck Configuration

[validation]
# Confidence level for every interval (0.0 to 1.0)
confidence_level = 0.95
# Relative tolerance for efficiency == throughput / power
efficiency_tolerance = 1e-6
# Abort on the first invalid row instead of rejecting it
strict = false
# Require throughput ~= batch_size / latency (off for pipelined accelerators)
check_throughput_latency = false
throughput_latency_tolerance = 0.05

[limits]
# Records outside this temperature range are rejected (degrees Celsius)
temperature_min = -40.0
temperature_max = 150.0
# Expected operating ranges, scored as physical validity (latency, throughput)
# and range validation (power, temperature); they never reject a record
latency_min = 0.1
latency_max = 1000.0
throughput_min = 1.0
throughput_max = 10000.0
power_min = 10.0
power_max = 100.0
plausible_temperature_min = 20.0
plausible_temperature_max = 100.0

[power]
# Significance level
alpha = 0.05
two_sided = true
# Power is computed for every effect size / sample size pair (uncomment to enable)
# effect_sizes = [0.2, 0.5, 0.8]
# sample_sizes = [50, 100, 1199]

[assessment]
# Consistency rate (%) for EXCELLENT / GOOD data quality
excellent_rate = 95.0
good_rate = 90.0
# Record counts above which statistical validity is HIGH / MEDIUM
high_validity_records = 1000
medium_validity_records = 100
# PASSED needs this consistency rate (%) and more than this many records
pass_rate = 95.0
pass_min_records = 1000

[output]
# Default output format: human, json
format = "human"
# Directory for relative --output paths
directory = "."

[runner]
# Threads for checks and estimation (0 = all cores, 1 = serial)
threads = 0
"#
        .to_string()
    }
}
