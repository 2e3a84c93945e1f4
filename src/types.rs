use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Closed set of file kinds the scanner assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Component,
    Page,
    Api,
    Script,
    Config,
    Documentation,
    Test,
    Utility,
    Style,
    Unknown,
}

impl FileKind {
    pub const ALL: [FileKind; 10] = [
        FileKind::Component,
        FileKind::Page,
        FileKind::Api,
        FileKind::Script,
        FileKind::Config,
        FileKind::Documentation,
        FileKind::Test,
        FileKind::Utility,
        FileKind::Style,
        FileKind::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Component => "component",
            FileKind::Page => "page",
            FileKind::Api => "api",
            FileKind::Script => "script",
            FileKind::Config => "config",
            FileKind::Documentation => "documentation",
            FileKind::Test => "test",
            FileKind::Utility => "utility",
            FileKind::Style => "style",
            FileKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptCategory {
    Build,
    Dev,
    Test,
    Automation,
    Utility,
}

impl fmt::Display for ScriptCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScriptCategory::Build => "build",
            ScriptCategory::Dev => "dev",
            ScriptCategory::Test => "test",
            ScriptCategory::Automation => "automation",
            ScriptCategory::Utility => "utility",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionFrequency {
    High,
    Medium,
    Low,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub component_name: String,
    pub is_ui_component: bool,
    pub hooks: Vec<String>,
    pub props: Vec<String>,
    pub complexity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiInfo {
    pub route: String,
    /// `GET`, `POST`, `PUT`, `DELETE`, `PATCH` or `UNKNOWN`.
    pub method: String,
    pub handlers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptInfo {
    pub category: ScriptCategory,
    pub execution_frequency: ExecutionFrequency,
}

/// Kind-specific data attached to a [`FileRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FileDetails {
    General,
    Component(ComponentInfo),
    Api(ApiInfo),
    Script(ScriptInfo),
}

/// One scanned source file. Immutable once the scan that produced it finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the scan root, `/`-separated. Unique key.
    pub path: String,
    pub name: String,
    pub extension: String,
    pub kind: FileKind,
    pub size: u64,
    pub lines_of_code: usize,
    /// Raw import specifiers as written in the source.
    pub dependencies: Vec<String>,
    pub exports: Vec<String>,
    pub is_test_file: bool,
    pub details: FileDetails,
}

impl FileRecord {
    pub fn component(&self) -> Option<&ComponentInfo> {
        match &self.details {
            FileDetails::Component(info) => Some(info),
            _ => None,
        }
    }

    pub fn api(&self) -> Option<&ApiInfo> {
        match &self.details {
            FileDetails::Api(info) => Some(info),
            _ => None,
        }
    }

    pub fn script(&self) -> Option<&ScriptInfo> {
        match &self.details {
            FileDetails::Script(info) => Some(info),
            _ => None,
        }
    }

    /// File name without its final extension.
    pub fn stem(&self) -> &str {
        match self.name.rfind('.') {
            Some(idx) if idx > 0 => &self.name[..idx],
            _ => &self.name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyEntry {
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    /// Files whose resolved imports include this file. Derived, never edited.
    pub dependents: Vec<String>,
}

pub type DependencyMap = BTreeMap<String, DependencyEntry>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanWarning {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub total_files: usize,
    pub total_lines_of_code: usize,
    /// Sorted by path.
    pub files: Vec<FileRecord>,
    pub dependencies: DependencyMap,
    pub warnings: Vec<ScanWarning>,
    pub scanned_at: DateTime<Utc>,
}

impl ScanResult {
    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.files
            .binary_search_by(|f| f.path.as_str().cmp(path))
            .ok()
            .map(|idx| &self.files[idx])
    }

    pub fn files_of_kind(&self, kind: FileKind) -> Vec<&FileRecord> {
        self.files.iter().filter(|f| f.kind == kind).collect()
    }

    /// Every kind is present as a key, even when it has no files.
    pub fn files_by_kind(&self) -> BTreeMap<FileKind, Vec<&FileRecord>> {
        let mut grouped: BTreeMap<FileKind, Vec<&FileRecord>> =
            FileKind::ALL.iter().map(|k| (*k, Vec::new())).collect();
        for file in &self.files {
            grouped.entry(file.kind).or_default().push(file);
        }
        grouped
    }

    pub fn components(&self) -> Vec<&FileRecord> {
        self.files_of_kind(FileKind::Component)
    }

    pub fn apis(&self) -> Vec<&FileRecord> {
        self.files_of_kind(FileKind::Api)
    }

    pub fn scripts(&self) -> Vec<&FileRecord> {
        self.files_of_kind(FileKind::Script)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Classification {
    Essential,
    #[serde(rename = "Nice-to-Have")]
    NiceToHave,
    Bloat,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Essential => "Essential",
            Classification::NiceToHave => "Nice-to-Have",
            Classification::Bloat => "Bloat",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    Keep,
    Simplify,
    Remove,
    Defer,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Keep => "Keep",
            Recommendation::Simplify => "Simplify",
            Recommendation::Remove => "Remove",
            Recommendation::Defer => "Defer",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effort {
    Small,
    Medium,
    Large,
}

/// Shared by cycle severity and removal risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
        };
        f.write_str(s)
    }
}

/// Per-file outcome of one classification run. Replaced wholesale on re-run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub classification: Classification,
    pub recommendation: Recommendation,
    pub priority: Priority,
    pub effort: Effort,
    pub reasoning: String,
    pub score: f64,
    pub risks: Vec<String>,
    pub benefits: Vec<String>,
}

pub type ClassificationMap = BTreeMap<String, ClassificationResult>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularDependency {
    /// Members in discovery order; the first member is not repeated at the end.
    pub cycle: Vec<String>,
    pub severity: RiskLevel,
    pub impact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactAnalysis {
    pub target: String,
    pub affected_files: Vec<String>,
    pub risk_level: RiskLevel,
    pub cascade_effects: Vec<String>,
    pub mitigation_steps: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_files: usize,
    pub total_lines_of_code: usize,
    pub essential_files: usize,
    pub nice_to_have_files: usize,
    pub bloat_files: usize,
    pub removal_candidates: usize,
    pub simplification_candidates: usize,
}

impl AnalysisSummary {
    /// Share of `count` in the total file count, as a percentage.
    pub fn percent_of_total(&self, count: usize) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            count as f64 / self.total_files as f64 * 100.0
        }
    }
}
