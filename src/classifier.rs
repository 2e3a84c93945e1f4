//! Rule-based Essential / Nice-to-Have / Bloat classification.
//!
//! Every result is a pure function of one [`FileRecord`] and the
//! [`ScoringPolicy`]; no other file is consulted.

use crate::types::{
    Classification, ClassificationMap, ClassificationResult, Effort, FileKind, FileRecord,
    Priority, Recommendation, ScriptCategory,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const CORE_FEATURE_KEYWORDS: [&str; 12] = [
    "authentication",
    "login",
    "signup",
    "company",
    "review",
    "search",
    "filter",
    "form",
    "button",
    "input",
    "card",
    "list",
];

pub const NICE_TO_HAVE_KEYWORDS: [&str; 10] = [
    "profile",
    "notification",
    "email",
    "image",
    "upload",
    "social",
    "like",
    "share",
    "dashboard",
    "admin",
];

pub const BLOAT_KEYWORDS: [&str; 14] = [
    "scraping",
    "scraper",
    "monitoring",
    "analytics",
    "metrics",
    "distress",
    "rising",
    "wall",
    "fame",
    "shame",
    "mcp",
    "automation",
    "advanced",
    "complex",
];

/// Weights, cutoffs and keyword sets used for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub functionality_weight: f64,
    pub user_value_weight: f64,
    pub complexity_weight: f64,
    pub velocity_weight: f64,
    pub overhead_weight: f64,
    pub essential_threshold: f64,
    pub nice_to_have_threshold: f64,
    pub large_file_loc: usize,
    pub medium_file_loc: usize,
    pub many_dependencies: usize,
    pub some_dependencies: usize,
    pub core_keywords: Vec<String>,
    pub nice_to_have_keywords: Vec<String>,
    pub bloat_keywords: Vec<String>,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            functionality_weight: 0.4,
            user_value_weight: 0.3,
            complexity_weight: -0.15,
            velocity_weight: -0.1,
            overhead_weight: -0.05,
            essential_threshold: 6.0,
            nice_to_have_threshold: 3.0,
            large_file_loc: 500,
            medium_file_loc: 200,
            many_dependencies: 10,
            some_dependencies: 5,
            core_keywords: CORE_FEATURE_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            nice_to_have_keywords: NICE_TO_HAVE_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            bloat_keywords: BLOAT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The five 0..=10 criteria a score is composed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationCriteria {
    /// Higher means removing the file hurts core flows more.
    pub functionality_impact: f64,
    /// Higher means more maintenance burden.
    pub complexity_cost: f64,
    pub user_value: f64,
    /// Higher means the file slows development down more.
    pub development_velocity: f64,
    pub operational_overhead: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeywordMatch {
    Core,
    NiceToHave,
    Bloat,
    None,
}

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    policy: ScoringPolicy,
}

impl Classifier {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn classify_files(&self, files: &[FileRecord]) -> ClassificationMap {
        files
            .iter()
            .map(|file| (file.path.clone(), self.classify_file(file)))
            .collect()
    }

    pub fn classify_file(&self, file: &FileRecord) -> ClassificationResult {
        let criteria = self.evaluate_criteria(file);
        let score = self.calculate_score(&criteria);
        let classification = self.determine_classification(score, file);
        let recommendation = recommend(classification, &criteria, file);

        ClassificationResult {
            classification,
            recommendation,
            priority: prioritize(classification, &criteria),
            effort: estimate_effort(file, recommendation),
            reasoning: reasoning(file, &criteria),
            score,
            risks: risks(file, recommendation),
            benefits: benefits(file, recommendation),
        }
    }

    pub fn evaluate_criteria(&self, file: &FileRecord) -> ClassificationCriteria {
        let path = file.path.to_lowercase();
        let name = file.name.to_lowercase();
        let is_core = self.matches_any(&self.policy.core_keywords, &path, &name);
        let is_bloat = self.matches_any(&self.policy.bloat_keywords, &path, &name);

        let functionality_impact = match self.keyword_match(&path, &name) {
            KeywordMatch::Core => 9.0,
            KeywordMatch::NiceToHave => 5.0,
            KeywordMatch::Bloat => 1.0,
            KeywordMatch::None => 3.0,
        };

        let complexity_cost = match file.component() {
            Some(component) if file.kind == FileKind::Component && component.complexity > 0 => {
                (component.complexity as f64 / 2.0).min(10.0)
            }
            _ if file.lines_of_code > self.policy.large_file_loc => 8.0,
            _ if file.lines_of_code > self.policy.medium_file_loc => 5.0,
            _ => 2.0,
        };

        let user_value = match file.kind {
            FileKind::Test => 3.0,
            FileKind::Documentation if is_core => 4.0,
            FileKind::Documentation => 1.0,
            _ => functionality_impact,
        };

        let development_velocity = if file.dependencies.len() > self.policy.many_dependencies {
            7.0
        } else if file.dependencies.len() > self.policy.some_dependencies {
            4.0
        } else {
            1.0
        };

        let operational_overhead = if is_automation_script(file) {
            6.0
        } else if file.kind == FileKind::Config {
            3.0
        } else if is_bloat {
            5.0
        } else {
            1.0
        };

        ClassificationCriteria {
            functionality_impact,
            complexity_cost,
            user_value,
            development_velocity,
            operational_overhead,
        }
    }

    pub fn calculate_score(&self, criteria: &ClassificationCriteria) -> f64 {
        let p = &self.policy;
        criteria.functionality_impact * p.functionality_weight
            + criteria.user_value * p.user_value_weight
            + criteria.complexity_cost * p.complexity_weight
            + criteria.development_velocity * p.velocity_weight
            + criteria.operational_overhead * p.overhead_weight
    }

    /// Keyword overrides win over the score: bloat first, then core.
    fn determine_classification(&self, score: f64, file: &FileRecord) -> Classification {
        let path = file.path.to_lowercase();
        let name = file.name.to_lowercase();

        if self.matches_any(&self.policy.bloat_keywords, &path, &name) {
            return Classification::Bloat;
        }
        if self.matches_any(&self.policy.core_keywords, &path, &name) {
            return Classification::Essential;
        }

        if score >= self.policy.essential_threshold {
            Classification::Essential
        } else if score >= self.policy.nice_to_have_threshold {
            Classification::NiceToHave
        } else {
            Classification::Bloat
        }
    }

    fn keyword_match(&self, path: &str, name: &str) -> KeywordMatch {
        if self.matches_any(&self.policy.core_keywords, path, name) {
            KeywordMatch::Core
        } else if self.matches_any(&self.policy.nice_to_have_keywords, path, name) {
            KeywordMatch::NiceToHave
        } else if self.matches_any(&self.policy.bloat_keywords, path, name) {
            KeywordMatch::Bloat
        } else {
            KeywordMatch::None
        }
    }

    fn matches_any(&self, keywords: &[String], path: &str, name: &str) -> bool {
        keywords
            .iter()
            .any(|k| path.contains(k.as_str()) || name.contains(k.as_str()))
    }
}

fn is_automation_script(file: &FileRecord) -> bool {
    file.kind == FileKind::Script
        && file
            .script()
            .is_some_and(|s| s.category == ScriptCategory::Automation)
}

fn recommend(
    classification: Classification,
    criteria: &ClassificationCriteria,
    file: &FileRecord,
) -> Recommendation {
    match classification {
        Classification::Essential if criteria.complexity_cost > 7.0 => Recommendation::Simplify,
        Classification::Essential => Recommendation::Keep,
        Classification::NiceToHave if criteria.complexity_cost > 6.0 => Recommendation::Simplify,
        Classification::NiceToHave if criteria.development_velocity > 5.0 => Recommendation::Defer,
        Classification::NiceToHave => Recommendation::Keep,
        Classification::Bloat => match file.kind {
            FileKind::Test | FileKind::Documentation => Recommendation::Defer,
            _ => Recommendation::Remove,
        },
    }
}

fn prioritize(classification: Classification, criteria: &ClassificationCriteria) -> Priority {
    match classification {
        Classification::Bloat if criteria.operational_overhead > 5.0 => Priority::High,
        Classification::Essential if criteria.complexity_cost > 7.0 => Priority::High,
        Classification::Bloat => Priority::Medium,
        _ => Priority::Low,
    }
}

fn estimate_effort(file: &FileRecord, recommendation: Recommendation) -> Effort {
    match recommendation {
        Recommendation::Remove if file.dependencies.len() > 5 || file.lines_of_code > 300 => {
            Effort::Medium
        }
        Recommendation::Simplify if file.lines_of_code > 500 => Effort::Large,
        Recommendation::Simplify if file.lines_of_code > 200 => Effort::Medium,
        _ => Effort::Small,
    }
}

fn reasoning(file: &FileRecord, criteria: &ClassificationCriteria) -> String {
    let mut reasons = Vec::new();

    reasons.push(if criteria.functionality_impact >= 8.0 {
        "Critical for core user functionality"
    } else if criteria.functionality_impact >= 5.0 {
        "Supports important user features"
    } else {
        "Limited impact on core user flows"
    });

    if criteria.complexity_cost >= 7.0 {
        reasons.push("High maintenance burden");
    } else if criteria.complexity_cost >= 4.0 {
        reasons.push("Moderate complexity");
    }

    if criteria.user_value >= 7.0 {
        reasons.push("High user value");
    } else if criteria.user_value <= 2.0 {
        reasons.push("Minimal user value");
    }

    match file.kind {
        FileKind::Test => reasons.push("Testing infrastructure"),
        FileKind::Documentation => reasons.push("Documentation overhead"),
        FileKind::Script if is_automation_script(file) => reasons.push("Automation complexity"),
        _ => {}
    }

    reasons.join("; ")
}

fn risks(file: &FileRecord, recommendation: Recommendation) -> Vec<String> {
    let mut risks = Vec::new();

    match recommendation {
        Recommendation::Remove => {
            if !file.dependencies.is_empty() {
                risks.push("May break dependent components");
            }
            if file.kind == FileKind::Api {
                risks.push("May break frontend functionality");
            }
            if file.kind == FileKind::Component {
                risks.push("May break UI functionality");
            }
        }
        Recommendation::Simplify => {
            risks.push("May reduce functionality");
            if file.kind == FileKind::Component {
                risks.push("May affect user experience");
            }
        }
        _ => {}
    }

    if file.kind == FileKind::Config {
        risks.push("May affect build or deployment");
    }

    risks.into_iter().map(String::from).collect()
}

fn benefits(file: &FileRecord, recommendation: Recommendation) -> Vec<String> {
    let benefits: Vec<&str> = match recommendation {
        Recommendation::Remove => {
            let mut b = vec!["Reduces codebase complexity", "Improves maintainability"];
            if file.lines_of_code > 100 {
                b.push("Significant LOC reduction");
            }
            b
        }
        Recommendation::Simplify => vec!["Easier to understand and modify", "Reduced maintenance burden"],
        Recommendation::Defer => vec!["Reduces immediate complexity", "Can be restored if needed"],
        Recommendation::Keep => vec![],
    };
    benefits.into_iter().map(String::from).collect()
}

/// Feature name shared by an API route and its component: the last path
/// segment up to its first `.`.
fn feature_name(path: &str) -> &str {
    let last = path.rsplit('/').next().unwrap_or(path);
    last.split('.').next().unwrap_or(last)
}

/// Flags API/component pairs with the same feature name where one side is
/// Essential and the other Bloat. Reports only; classifications are untouched.
pub fn validate_classification_consistency(
    files: &[FileRecord],
    classifications: &ClassificationMap,
) -> Vec<String> {
    let mut components: HashMap<&str, Vec<&FileRecord>> = HashMap::new();
    for file in files.iter().filter(|f| f.kind == FileKind::Component) {
        components.entry(feature_name(&file.path)).or_default().push(file);
    }

    let mut issues = Vec::new();
    for api in files.iter().filter(|f| f.kind == FileKind::Api) {
        let Some(api_class) = classifications.get(&api.path).map(|r| r.classification) else {
            continue;
        };
        let Some(matching) = components.get(feature_name(&api.path)) else {
            continue;
        };

        for component in matching {
            let Some(component_class) = classifications
                .get(&component.path)
                .map(|r| r.classification)
            else {
                continue;
            };

            let conflicting = matches!(
                (api_class, component_class),
                (Classification::Essential, Classification::Bloat)
                    | (Classification::Bloat, Classification::Essential)
            );
            if conflicting {
                issues.push(format!(
                    "Inconsistent classification between API {} ({}) and component {} ({})",
                    api.path, api_class, component.path, component_class
                ));
            }
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ApiInfo, ComponentInfo, ExecutionFrequency, FileDetails, ScriptInfo};

    fn record(path: &str, kind: FileKind, loc: usize, deps: usize) -> FileRecord {
        FileRecord {
            path: path.to_string(),
            name: path.rsplit('/').next().unwrap().to_string(),
            extension: ".tsx".to_string(),
            kind,
            size: (loc * 40) as u64,
            lines_of_code: loc,
            dependencies: (0..deps).map(|i| format!("./dep{i}")).collect(),
            exports: vec![],
            is_test_file: kind == FileKind::Test,
            details: FileDetails::General,
        }
    }

    fn component(path: &str, loc: usize, deps: usize, complexity: usize) -> FileRecord {
        let mut file = record(path, FileKind::Component, loc, deps);
        file.details = FileDetails::Component(ComponentInfo {
            component_name: file.stem().to_string(),
            is_ui_component: true,
            hooks: vec![],
            props: vec![],
            complexity,
        });
        file
    }

    #[test]
    fn bloat_keyword_forces_removal_of_large_component() {
        let classifier = Classifier::default();
        let file = component("src/components/ScrapingDashboard.tsx", 650, 3, 14);

        let criteria = classifier.evaluate_criteria(&file);
        // "dashboard" is a nice-to-have keyword and is checked before bloat.
        assert_eq!(criteria.functionality_impact, 5.0);
        assert_eq!(criteria.complexity_cost, 7.0);
        assert_eq!(criteria.operational_overhead, 5.0);

        let result = classifier.classify_file(&file);
        assert_eq!(result.classification, Classification::Bloat);
        assert_eq!(result.recommendation, Recommendation::Remove);
        assert_eq!(result.priority, Priority::Medium);
        assert_eq!(result.effort, Effort::Medium);
        assert_eq!(
            result.risks,
            vec!["May break dependent components", "May break UI functionality"]
        );
        assert!(result.benefits.contains(&"Significant LOC reduction".to_string()));
    }

    #[test]
    fn pure_bloat_path_scores_lowest_impact() {
        let classifier = Classifier::default();
        let file = record("src/lib/scraper.ts", FileKind::Utility, 40, 0);
        assert_eq!(classifier.evaluate_criteria(&file).functionality_impact, 1.0);
        assert_eq!(classifier.classify_file(&file).classification, Classification::Bloat);
    }

    #[test]
    fn core_keyword_forces_essential() {
        let classifier = Classifier::default();
        let file = component("src/components/LoginForm.tsx", 80, 2, 0);

        let criteria = classifier.evaluate_criteria(&file);
        assert_eq!(criteria.functionality_impact, 9.0);
        assert_eq!(criteria.complexity_cost, 2.0);

        let result = classifier.classify_file(&file);
        assert_eq!(result.classification, Classification::Essential);
        assert_eq!(result.recommendation, Recommendation::Keep);
        assert_eq!(result.priority, Priority::Low);
        assert!((result.score - 5.85).abs() < 1e-9);
        assert_eq!(
            result.reasoning,
            "Critical for core user functionality; High user value"
        );
    }

    #[test]
    fn overrides_short_circuit_the_score() {
        let classifier = Classifier::default();
        // Score alone would not reach Nice-to-Have.
        let file = record("docs/search-guide.md", FileKind::Documentation, 900, 12);
        let result = classifier.classify_file(&file);
        assert!(result.score < classifier.policy().nice_to_have_threshold);
        assert_eq!(result.classification, Classification::Essential);
        assert_eq!(result.recommendation, Recommendation::Simplify);
        assert_eq!(result.priority, Priority::High);
        assert_eq!(result.effort, Effort::Large);

        // Bloat wins even when a core keyword is also present.
        let both = record("src/components/AdvancedSearch.tsx", FileKind::Component, 50, 0);
        assert_eq!(classifier.classify_file(&both).classification, Classification::Bloat);
    }

    #[test]
    fn score_thresholds_apply_without_keywords() {
        let classifier = Classifier::default();
        // impact 3, value 3, cost 2, velocity 1, overhead 1
        let file = record("src/lib/helpers.ts", FileKind::Utility, 20, 0);
        let result = classifier.classify_file(&file);
        assert!((result.score - 1.65).abs() < 1e-9);
        assert_eq!(result.classification, Classification::Bloat);

        let lenient = Classifier::new(ScoringPolicy {
            nice_to_have_threshold: 1.0,
            ..ScoringPolicy::default()
        });
        assert_eq!(
            lenient.classify_file(&file).classification,
            Classification::NiceToHave
        );
    }

    #[test]
    fn bloat_docs_and_tests_are_deferred() {
        let classifier = Classifier::default();
        let doc = record("docs/notes.md", FileKind::Documentation, 30, 0);
        let result = classifier.classify_file(&doc);
        assert_eq!(result.classification, Classification::Bloat);
        assert_eq!(result.recommendation, Recommendation::Defer);
        assert_eq!(
            result.benefits,
            vec!["Reduces immediate complexity", "Can be restored if needed"]
        );
        assert!(result.reasoning.ends_with("Documentation overhead"));
    }

    #[test]
    fn automation_scripts_carry_high_overhead() {
        let classifier = Classifier::default();
        let mut file = record("tools/scripts/nightly-sync.ts", FileKind::Script, 120, 1);
        file.details = FileDetails::Script(ScriptInfo {
            category: ScriptCategory::Automation,
            execution_frequency: ExecutionFrequency::Low,
        });
        let criteria = classifier.evaluate_criteria(&file);
        assert_eq!(criteria.operational_overhead, 6.0);

        let result = classifier.classify_file(&file);
        assert_eq!(result.classification, Classification::Bloat);
        assert_eq!(result.priority, Priority::High);
        assert!(result.reasoning.contains("Automation complexity"));
    }

    #[test]
    fn classification_is_deterministic() {
        let classifier = Classifier::default();
        let a = component("src/components/ProfileCard.tsx", 240, 7, 9);
        let b = a.clone();
        assert_eq!(classifier.classify_file(&a), classifier.classify_file(&b));

        let map = classifier.classify_files(&[a]);
        let json = serde_json::to_string(&map).unwrap();
        let back: ClassificationMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn flags_inconsistent_api_and_component_pairs() {
        let classifier = Classifier::default();
        let mut api = record("src/app/api/analytics.ts", FileKind::Api, 30, 0);
        api.details = FileDetails::Api(ApiInfo {
            route: "/analytics".to_string(),
            method: "GET".to_string(),
            handlers: vec!["GET".to_string()],
        });
        // Feature names match on the segment before the first dot.
        let ui = component("src/components/analytics.tsx", 30, 0, 0);
        let files = vec![api.clone(), ui.clone()];

        let mut map = classifier.classify_files(&files);
        assert!(validate_classification_consistency(&files, &map).is_empty());

        map.get_mut(&ui.path).unwrap().classification = Classification::Essential;
        let issues = validate_classification_consistency(&files, &map);
        assert_eq!(
            issues,
            vec![
                "Inconsistent classification between API src/app/api/analytics.ts (Bloat) and component src/components/analytics.tsx (Essential)"
                    .to_string()
            ]
        );
    }
}
