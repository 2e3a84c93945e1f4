use crate::classifier::ScoringPolicy;
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub target_directory: PathBuf,
    pub scan: ScanConfig,
    pub report: ReportConfig,
    pub visualization: VisualizationConfig,
    pub scoring: ScoringPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// A directory whose name contains any of these is not descended into.
    pub exclude_patterns: Vec<String>,
    /// Files are kept when their name ends with one of these.
    pub source_extensions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    pub include_detailed_tables: bool,
    pub include_dependency_graph: bool,
    pub include_statistics: bool,
    pub mermaid_max_nodes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationConfig {
    pub max_nodes: usize,
    pub show_only_connected: bool,
    pub width: f64,
    pub height: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_directory: PathBuf::from("."),
            scan: ScanConfig::default(),
            report: ReportConfig::default(),
            visualization: VisualizationConfig::default(),
            scoring: ScoringPolicy::default(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude_patterns: vec![
                "node_modules".to_string(),
                ".git".to_string(),
                ".next".to_string(),
                "dist".to_string(),
                "build".to_string(),
                ".env".to_string(),
                ".env.local".to_string(),
                ".env.production".to_string(),
                ".env.development".to_string(),
            ],
            source_extensions: vec![
                ".ts".to_string(),
                ".tsx".to_string(),
                ".js".to_string(),
                ".jsx".to_string(),
                ".json".to_string(),
                ".md".to_string(),
                ".sql".to_string(),
                ".yml".to_string(),
                ".yaml".to_string(),
            ],
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./reports"),
            include_detailed_tables: true,
            include_dependency_graph: true,
            include_statistics: true,
            mermaid_max_nodes: 30,
        }
    }
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            max_nodes: 50,
            show_only_connected: true,
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Config {
    /// Get the default config file path (~/.mvp-redundancy.toml)
    pub fn default_config_path() -> crate::Result<PathBuf> {
        let home_dir = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(PathBuf::from(home_dir).join(".mvp-redundancy.toml"))
    }

    /// Load config from the default location, falling back to defaults if it doesn't exist
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            info!("Loading configuration from {}", config_path.display());
            Self::from_file(&config_path)
        } else {
            info!("No config file at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &PathBuf) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_file(&self, path: &PathBuf) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.scan.source_extensions.is_empty() {
            return Err(AnalysisError::Config(
                "scan.source_extensions must not be empty".to_string(),
            ));
        }
        if self.scoring.nice_to_have_threshold > self.scoring.essential_threshold {
            return Err(AnalysisError::Config(format!(
                "scoring.nice_to_have_threshold ({}) exceeds scoring.essential_threshold ({})",
                self.scoring.nice_to_have_threshold, self.scoring.essential_threshold
            )));
        }
        if self.scoring.medium_file_loc > self.scoring.large_file_loc {
            return Err(AnalysisError::Config(
                "scoring.medium_file_loc must not exceed scoring.large_file_loc".to_string(),
            ));
        }
        if self.scoring.some_dependencies > self.scoring.many_dependencies {
            return Err(AnalysisError::Config(
                "scoring.some_dependencies must not exceed scoring.many_dependencies".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a config file with all available options documented
    pub fn create_documented_config() -> String {
        r#"# MVP redundancy analysis configuration

# Directory to analyze (defaults to current directory)
target_directory = "."

[scan]
# Directory names containing any of these are skipped
exclude_patterns = [
    "node_modules",
    ".git",
    ".next",
    "dist",
    "build",
    ".env",
    ".env.local",
    ".env.production",
    ".env.development",
]

# Only files ending in one of these are scanned
source_extensions = [".ts", ".tsx", ".js", ".jsx", ".json", ".md", ".sql", ".yml", ".yaml"]

[report]
# Where mvp-redundancy-analysis-report.{md,json} are written
output_dir = "./reports"
include_detailed_tables = true
include_dependency_graph = true
include_statistics = true
# Nodes kept in the Mermaid diagram of the report appendix
mermaid_max_nodes = 30

[visualization]
max_nodes = 50
show_only_connected = true
width = 800.0
height = 600.0

[scoring]
# Composite score weights (negative weights penalize cost)
functionality_weight = 0.4
user_value_weight = 0.3
complexity_weight = -0.15
velocity_weight = -0.1
overhead_weight = -0.05

# Score cutoffs when no keyword override applies
essential_threshold = 6.0
nice_to_have_threshold = 3.0

# Lines-of-code tiers for complexity cost
large_file_loc = 500
medium_file_loc = 200

# Import-count tiers for development velocity
many_dependencies = 10
some_dependencies = 5

# Keyword sets, checked in this order: core, nice-to-have, bloat
core_keywords = ["authentication", "login", "signup", "company", "review", "search", "filter", "form", "button", "input", "card", "list"]
nice_to_have_keywords = ["profile", "notification", "email", "image", "upload", "social", "like", "share", "dashboard", "admin"]
bloat_keywords = ["scraping", "scraper", "monitoring", "analytics", "metrics", "distress", "rising", "wall", "fame", "shame", "mcp", "automation", "advanced", "complex"]
"#
        .to_string()
    }
}
