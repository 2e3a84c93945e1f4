use crate::dependency_graph::DependencyGraph;
use crate::error::AnalysisError;
use crate::resolver::is_relative;
use crate::types::{FileRecord, ImpactAnalysis, RiskLevel};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::path::Path;
use tracing::warn;

/// Hops followed past the direct dependents when walking a removal cascade.
pub const MAX_CASCADE_DEPTH: usize = 3;
const HIGH_RISK_AFFECTED: usize = 5;
const MEDIUM_RISK_AFFECTED: usize = 2;

/// Packages the toolchain uses without any source file importing them.
const IMPLICIT_PACKAGES: [&str; 8] = [
    "typescript",
    "next",
    "@types/node",
    "@types/react",
    "eslint",
    "prettier",
    "postcss",
    "tailwindcss",
];

const SAFE_TO_REMOVE_PACKAGES: [&str; 5] = ["lodash", "moment", "axios", "uuid", "classnames"];

pub fn assess_removal_risk(affected_files: usize, is_circular: bool) -> RiskLevel {
    if affected_files > HIGH_RISK_AFFECTED || is_circular {
        RiskLevel::High
    } else if affected_files > MEDIUM_RISK_AFFECTED {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// What breaks if `target` is deleted.
///
/// Direct dependents are always affected. Their dependents are then followed
/// breadth-first for at most [`MAX_CASCADE_DEPTH`] further hops, each newly
/// reached file adding one cascade line. The target itself is never listed,
/// even when it sits on a cycle. Unknown targets yield an empty, `Low` result.
pub fn analyze_removal_impact(graph: &DependencyGraph, target: &str) -> ImpactAnalysis {
    let Some(node) = graph.node(target) else {
        return ImpactAnalysis {
            target: target.to_string(),
            affected_files: Vec::new(),
            risk_level: RiskLevel::Low,
            cascade_effects: Vec::new(),
            mitigation_steps: Vec::new(),
        };
    };

    let mut affected_files: Vec<String> = node.dependents.clone();
    let mut seen: HashSet<&str> = node.dependents.iter().map(String::as_str).collect();
    seen.insert(target);
    let mut cascade_effects = Vec::new();

    let mut queue: VecDeque<(&str, usize)> =
        node.dependents.iter().map(|d| (d.as_str(), 1)).collect();
    let mut expanded: HashSet<&str> = HashSet::new();

    while let Some((current, depth)) = queue.pop_front() {
        if depth > MAX_CASCADE_DEPTH || !expanded.insert(current) {
            continue;
        }
        let Some(current_node) = graph.node(current) else {
            continue;
        };
        for dependent in &current_node.dependents {
            if seen.insert(dependent.as_str()) {
                affected_files.push(dependent.clone());
                cascade_effects.push(format!(
                    "{dependent} depends on {current} which depends on {target}"
                ));
            }
            queue.push_back((dependent.as_str(), depth + 1));
        }
    }

    let risk_level = assess_removal_risk(affected_files.len(), node.is_circular);

    let mut mitigation_steps = Vec::new();
    if !affected_files.is_empty() {
        mitigation_steps.push("Update import statements in dependent files".to_string());
        mitigation_steps.push("Replace functionality or provide alternatives".to_string());
        if !node.dependencies.is_empty() {
            mitigation_steps.push("Ensure dependencies are still needed by other files".to_string());
        }
        if risk_level == RiskLevel::High {
            mitigation_steps.push("Consider gradual removal with feature flags".to_string());
            mitigation_steps.push("Implement comprehensive testing before removal".to_string());
        }
    }

    ImpactAnalysis {
        target: target.to_string(),
        affected_files,
        risk_level,
        cascade_effects,
        mitigation_steps,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnusedDependency {
    pub name: String,
    pub declared_in: Vec<String>,
    pub can_remove: bool,
    /// Rough 1..=10 complexity saving if the package goes away.
    pub complexity_savings: u8,
}

/// Package name of a bare import specifier. Scoped names keep two segments.
pub fn package_name(specifier: &str) -> Option<String> {
    if specifier.is_empty() || is_relative(specifier) || specifier.starts_with('/') {
        return None;
    }

    let mut parts = specifier.split('/');
    let first = parts.next()?;
    if first.starts_with('@') {
        match parts.next() {
            Some(second) => Some(format!("{first}/{second}")),
            None => Some(first.to_string()),
        }
    } else {
        Some(first.to_string())
    }
}

/// Declared packages in `manifest` (package.json text) that no file imports.
pub fn detect_unused_dependencies(
    manifest: &str,
    files: &[FileRecord],
) -> Result<Vec<UnusedDependency>, AnalysisError> {
    let value: serde_json::Value = serde_json::from_str(manifest)
        .map_err(|e| AnalysisError::PackageMetadataUnavailable(e.to_string()))?;
    if !value.is_object() {
        return Err(AnalysisError::PackageMetadataUnavailable(
            "manifest is not a JSON object".to_string(),
        ));
    }

    let mut declared = BTreeSet::new();
    for section in ["dependencies", "devDependencies"] {
        if let Some(packages) = value.get(section).and_then(|v| v.as_object()) {
            declared.extend(packages.keys().cloned());
        }
    }

    let used: HashSet<String> = files
        .iter()
        .flat_map(|f| f.dependencies.iter())
        .filter_map(|spec| package_name(spec))
        .collect();

    Ok(declared
        .into_iter()
        .filter(|name| !used.contains(name) && !IMPLICIT_PACKAGES.contains(&name.as_str()))
        .map(|name| UnusedDependency {
            can_remove: SAFE_TO_REMOVE_PACKAGES.contains(&name.as_str()),
            complexity_savings: complexity_savings(&name),
            declared_in: vec!["package.json".to_string()],
            name,
        })
        .collect())
}

/// Reads `<root>/package.json`. A missing or malformed manifest is logged and
/// treated as having no unused packages.
pub fn detect_unused_dependencies_in(root: &Path, files: &[FileRecord]) -> Vec<UnusedDependency> {
    let manifest_path = root.join("package.json");
    let result = std::fs::read_to_string(&manifest_path)
        .map_err(|e| {
            AnalysisError::PackageMetadataUnavailable(format!("{}: {e}", manifest_path.display()))
        })
        .and_then(|manifest| detect_unused_dependencies(&manifest, files));

    match result {
        Ok(unused) => unused,
        Err(err) => {
            warn!("Could not analyze package dependencies: {}", err);
            Vec::new()
        }
    }
}

fn complexity_savings(package: &str) -> u8 {
    match package {
        "lodash" => 3,
        "moment" => 4,
        "axios" => 2,
        "uuid" | "classnames" => 1,
        _ => 2,
    }
}
