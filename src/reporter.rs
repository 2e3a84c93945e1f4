use crate::{
    analyzer::ProjectAnalysis,
    config::ReportConfig,
    dependency_graph::DependencyAnalysis,
    error::AnalysisError,
    types::{AnalysisSummary, Classification, ClassificationMap, FileKind, FileRecord},
    visualizer::DependencyVisualizer,
};
use serde::{Deserialize, Serialize};
use std::{
    fmt::Write,
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

pub const ANALYSIS_VERSION: &str = "1.0.0";
pub const REPORT_FILE_STEM: &str = "mvp-redundancy-analysis-report";
const REASONING_PREVIEW_CHARS: usize = 50;
const HIGH_COMPLEXITY: usize = 10;

/// Assumed share of files and lines left after cleanup.
const RETAINED_AFTER_REMOVAL: f64 = 0.5;
const RETAINED_COMPONENTS: f64 = 0.7;
const RETAINED_APIS: f64 = 0.5;
const RETAINED_SCRIPTS: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Json,
    Markdown,
    All,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub summary: AnalysisSummary,
    pub classifications: ClassificationMap,
    pub dependency_analysis: DependencyAnalysis,
    pub consistency_warnings: Vec<String>,
    pub recommendations: RecommendationPlan,
    pub statistics: ReductionStatistics,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: String,
    pub analysis_version: String,
    pub total_files: usize,
    pub total_lines_of_code: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationPlan {
    pub immediate: Vec<String>,
    pub short_term: Vec<String>,
    pub long_term: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodebaseFigures {
    pub total_files: usize,
    pub total_lines_of_code: usize,
    pub components: usize,
    pub apis: usize,
    pub scripts: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionPercentages {
    pub files: u32,
    pub lines_of_code: u32,
    pub components: u32,
    pub apis: u32,
    pub scripts: u32,
}

/// Current counts next to projected post-cleanup counts.
///
/// `projected` and `reduction` come from fixed assumed factors, never from
/// measuring an actual cleanup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionStatistics {
    pub current: CodebaseFigures,
    pub projected: CodebaseFigures,
    pub reduction: ReductionPercentages,
    pub note: String,
}

impl ReductionStatistics {
    pub fn project(summary: &AnalysisSummary, components: usize, apis: usize, scripts: usize) -> Self {
        let scale = |count: usize, retained: f64| (count as f64 * retained).round() as usize;
        let percent = |retained: f64| ((1.0 - retained) * 100.0).round() as u32;

        Self {
            current: CodebaseFigures {
                total_files: summary.total_files,
                total_lines_of_code: summary.total_lines_of_code,
                components,
                apis,
                scripts,
            },
            projected: CodebaseFigures {
                total_files: scale(summary.total_files, RETAINED_AFTER_REMOVAL),
                total_lines_of_code: scale(summary.total_lines_of_code, RETAINED_AFTER_REMOVAL),
                components: scale(components, RETAINED_COMPONENTS),
                apis: scale(apis, RETAINED_APIS),
                scripts: scale(scripts, RETAINED_SCRIPTS),
            },
            reduction: ReductionPercentages {
                files: percent(RETAINED_AFTER_REMOVAL),
                lines_of_code: percent(RETAINED_AFTER_REMOVAL),
                components: percent(RETAINED_COMPONENTS),
                apis: percent(RETAINED_APIS),
                scripts: percent(RETAINED_SCRIPTS),
            },
            note: "Projected figures apply fixed assumed reduction factors; they are estimates, not measured outcomes".to_string(),
        }
    }
}

pub struct Reporter {
    config: ReportConfig,
}

impl Reporter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn generate_report(&self, analysis: &ProjectAnalysis) -> Report {
        Report {
            metadata: ReportMetadata {
                generated_at: chrono::Utc::now().to_rfc3339(),
                analysis_version: ANALYSIS_VERSION.to_string(),
                total_files: analysis.summary.total_files,
                total_lines_of_code: analysis.summary.total_lines_of_code,
            },
            summary: analysis.summary.clone(),
            classifications: analysis.classifications.clone(),
            dependency_analysis: analysis.dependency_analysis.clone(),
            consistency_warnings: analysis.consistency_warnings.clone(),
            recommendations: recommendation_plan(),
            statistics: self.statistics(analysis),
        }
    }

    fn statistics(&self, analysis: &ProjectAnalysis) -> ReductionStatistics {
        ReductionStatistics::project(
            &analysis.summary,
            analysis.scan.components().len(),
            analysis.scan.apis().len(),
            analysis.scan.scripts().len(),
        )
    }

    /// Write the requested report files into the configured output directory.
    pub fn export_report(
        &self,
        analysis: &ProjectAnalysis,
        format: ReportFormat,
    ) -> Result<Vec<PathBuf>, AnalysisError> {
        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir).map_err(|source| AnalysisError::ReportWrite {
            path: output_dir.clone(),
            source,
        })?;

        let mut written = Vec::new();

        if matches!(format, ReportFormat::Markdown | ReportFormat::All) {
            let md_path = output_dir.join(format!("{REPORT_FILE_STEM}.md"));
            write_report_file(&md_path, &self.render_markdown(analysis))?;
            info!("Markdown report generated: {}", md_path.display());
            written.push(md_path);
        }

        if matches!(format, ReportFormat::Json | ReportFormat::All) {
            let json_path = output_dir.join(format!("{REPORT_FILE_STEM}.json"));
            let report = self.generate_report(analysis);
            let json = serde_json::to_string_pretty(&report).map_err(|e| AnalysisError::ReportWrite {
                path: json_path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            })?;
            write_report_file(&json_path, &json)?;
            info!("JSON report generated: {}", json_path.display());
            written.push(json_path);
        }

        Ok(written)
    }

    pub fn render_markdown(&self, analysis: &ProjectAnalysis) -> String {
        let mut sections = vec![
            header(&analysis.summary),
            executive_summary(&analysis.summary),
            self.classification_summary(analysis),
            detailed_analysis(analysis),
            recommendations_section(),
            risk_assessment(&analysis.consistency_warnings),
            implementation_roadmap(),
        ];
        if self.config.include_statistics {
            sections.push(self.statistics_section(analysis));
        }
        sections.push(self.appendices(analysis));
        sections.join("\n\n")
    }

    fn classification_summary(&self, analysis: &ProjectAnalysis) -> String {
        let s = &analysis.summary;
        let mut md = String::from("## Classification Summary\n\n### Overall Distribution\n\n");
        md.push_str("| Classification | Count | Percentage | Recommendation |\n");
        md.push_str("|---------------|-------|------------|----------------|\n");
        let _ = writeln!(md, "| Essential | {} | {:.1}% | Keep |", s.essential_files, s.percent_of_total(s.essential_files));
        let _ = writeln!(md, "| Nice-to-Have | {} | {:.1}% | Evaluate |", s.nice_to_have_files, s.percent_of_total(s.nice_to_have_files));
        let _ = writeln!(md, "| Bloat | {} | {:.1}% | Remove |", s.bloat_files, s.percent_of_total(s.bloat_files));

        md.push_str("\n### Recommendation Summary\n\n");
        md.push_str("| Action | Count | Priority |\n");
        md.push_str("|--------|-------|----------|\n");
        let _ = writeln!(md, "| Keep | {} | - |", s.essential_files);
        let _ = writeln!(md, "| Simplify | {} | High |", s.simplification_candidates);
        let _ = writeln!(md, "| Remove | {} | High |", s.removal_candidates);
        let _ = write!(
            md,
            "| Defer | {} | Medium |",
            s.nice_to_have_files.saturating_sub(s.simplification_candidates)
        );

        if self.config.include_detailed_tables {
            md.push_str("\n\n");
            md.push_str(&detailed_tables(analysis));
        }
        md
    }

    fn statistics_section(&self, analysis: &ProjectAnalysis) -> String {
        let stats = self.statistics(analysis);
        let (c, p, r) = (&stats.current, &stats.projected, &stats.reduction);

        let mut md = String::from("## Statistics\n\n### Complexity Reduction Potential (Projected)\n\n");
        let _ = writeln!(md, "*{}.*\n", stats.note);
        md.push_str("| Metric | Current | Projected After Cleanup | Projected Reduction |\n");
        md.push_str("|--------|---------|-------------------------|---------------------|\n");
        let _ = writeln!(md, "| Total Files | {} | {} | {}% |", c.total_files, p.total_files, r.files);
        let _ = writeln!(
            md,
            "| Lines of Code | {} | {} | {}% |",
            with_thousands(c.total_lines_of_code),
            with_thousands(p.total_lines_of_code),
            r.lines_of_code
        );
        let _ = writeln!(md, "| Components | {} | {} | {}% |", c.components, p.components, r.components);
        let _ = writeln!(md, "| API Endpoints | {} | {} | {}% |", c.apis, p.apis, r.apis);
        let _ = writeln!(md, "| Scripts | {} | {} | {}% |", c.scripts, p.scripts, r.scripts);

        md.push_str("\n### File Type Distribution\n\n");
        md.push_str(&file_type_chart(analysis));
        md
    }

    fn appendices(&self, analysis: &ProjectAnalysis) -> String {
        let mut md = String::from(
            "## Appendices

### Appendix A: Methodology

This analysis used automated scanning and classification to:
1. Scan all source files and extract metadata
2. Build a dependency graph to understand relationships
3. Classify files against MVP necessity criteria
4. Generate recommendations with risk assessment

### Appendix B: Classification Criteria

**Essential:** Required for core user functionality
**Nice-to-Have:** Useful but not critical for the MVP
**Bloat:** Features that exceed MVP scope

### Appendix C: Glossary

- **MVP:** Minimum Viable Product, the core functionality users need
- **Bloat:** Code that adds complexity without providing essential value
- **Cascade:** The chain of dependents affected by removing a file
- **Criticality:** Twice the dependent count plus dependency depth",
        );

        if self.config.include_dependency_graph {
            md.push_str("\n\n### Appendix D: Dependency Analysis\n\n");
            md.push_str(&self.dependency_section(analysis));
        }
        md
    }

    fn dependency_section(&self, analysis: &ProjectAnalysis) -> String {
        let visualizer = DependencyVisualizer::new(&analysis.graph, &analysis.classifications);
        let stats = visualizer.statistics();
        let max_nodes = self.config.mermaid_max_nodes;

        let mut md = String::from("#### Dependency Statistics\n\n");
        let _ = writeln!(md, "- **Total Nodes:** {}", stats.total_nodes);
        let _ = writeln!(md, "- **Total Edges:** {}", stats.total_edges);
        let _ = writeln!(md, "- **Average Dependencies per File:** {:.2}", stats.average_dependencies);
        let _ = writeln!(md, "- **Average Dependents per File:** {:.2}", stats.average_dependents);
        let _ = writeln!(md, "- **Circular Dependencies:** {}", stats.circular_dependency_count);
        let _ = writeln!(md, "- **Orphaned Files:** {}", stats.orphaned_node_count);
        let _ = writeln!(md, "- **Unused Packages:** {}", analysis.unused_dependencies.len());

        let cycles = &analysis.dependency_analysis.circular_dependencies;
        if !cycles.is_empty() {
            md.push_str("\n#### Circular Dependencies\n\n");
            for cycle in cycles {
                let _ = writeln!(md, "- **{}:** {} ({})", cycle.severity, cycle.cycle.join(" → "), cycle.impact);
            }
        }

        let critical = &analysis.dependency_analysis.critical_paths;
        if !critical.is_empty() {
            md.push_str("\n#### Most Critical Files\n\n");
            md.push_str("| File | Dependents | Depth | Criticality |\n");
            md.push_str("|------|------------|-------|-------------|\n");
            for path in critical {
                let _ = writeln!(md, "| {} | {} | {} | {} |", path.file, path.dependent_count, path.depth, path.criticality);
            }
        }

        let _ = write!(
            md,
            "\n#### Dependency Graph (Top {max_nodes} Most Connected Files)\n\n```mermaid\n{}```\n\n#### Level Distribution\n\n",
            visualizer.mermaid_diagram(max_nodes)
        );
        for (level, count) in &stats.level_distribution {
            let _ = writeln!(md, "- **Level {level}:** {count} files");
        }
        md.push_str("\n*Note: Higher levels indicate longer import chains below a file. Level 0 files import nothing or sit on a cycle.*");
        md
    }
}

fn write_report_file(path: &Path, content: &str) -> Result<(), AnalysisError> {
    fs::write(path, content).map_err(|source| AnalysisError::ReportWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn header(summary: &AnalysisSummary) -> String {
    format!(
        "# MVP Redundancy Analysis Report\n\n**Generated:** {}  \n**Analysis Version:** {}  \n**Total Files Analyzed:** {}  \n**Total Lines of Code:** {}\n\n---",
        chrono::Utc::now().format("%Y-%m-%d at %H:%M:%S UTC"),
        ANALYSIS_VERSION,
        with_thousands(summary.total_files),
        with_thousands(summary.total_lines_of_code)
    )
}

fn executive_summary(s: &AnalysisSummary) -> String {
    format!(
        "## Executive Summary

This analysis identifies **{} files ({:.1}%)** as bloat that can be removed without impacting core MVP functionality.

### Key Findings

- **{:.1}%** of the codebase is essential for MVP functionality
- **{} files** are recommended for immediate removal
- **{} files** need simplification
- Projected reductions in the Statistics section are estimates from fixed factors, not measurements

### Impact Assessment

Removing files that exceed MVP scope will:

- Improve development velocity by reducing cognitive load
- Decrease build times and bundle sizes
- Simplify deployment and operational overhead
- Lower maintenance burden and technical debt",
        s.bloat_files,
        s.percent_of_total(s.bloat_files),
        s.percent_of_total(s.essential_files),
        s.removal_candidates,
        s.simplification_candidates
    )
}

fn preview(reasoning: &str) -> String {
    let short: String = reasoning.chars().take(REASONING_PREVIEW_CHARS).collect();
    format!("{short}...")
}

fn detailed_tables(analysis: &ProjectAnalysis) -> String {
    let classifications = &analysis.classifications;
    let mut md = String::from("### Detailed Classification by File Type\n\n");

    let components = analysis.scan.components();
    if !components.is_empty() {
        md.push_str("#### React Components\n\n");
        md.push_str("| Component | Classification | Recommendation | Complexity | LOC | Reasoning |\n");
        md.push_str("|-----------|---------------|----------------|------------|-----|----------|\n");
        for file in components {
            let Some(result) = classifications.get(&file.path) else {
                continue;
            };
            let (name, complexity) = match file.component() {
                Some(info) => (info.component_name.as_str(), info.complexity.to_string()),
                None => (file.name.as_str(), "N/A".to_string()),
            };
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} | {} | {} |",
                name, result.classification, result.recommendation, complexity, file.lines_of_code, preview(&result.reasoning)
            );
        }
        md.push('\n');
    }

    let apis = analysis.scan.apis();
    if !apis.is_empty() {
        md.push_str("#### API Endpoints\n\n");
        md.push_str("| Endpoint | Method | Classification | Recommendation | LOC | Reasoning |\n");
        md.push_str("|----------|--------|---------------|----------------|-----|----------|\n");
        for file in apis {
            let Some(result) = classifications.get(&file.path) else {
                continue;
            };
            let (route, method) = match file.api() {
                Some(info) => (info.route.as_str(), info.method.as_str()),
                None => (file.path.as_str(), "N/A"),
            };
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} | {} | {} |",
                route, method, result.classification, result.recommendation, file.lines_of_code, preview(&result.reasoning)
            );
        }
        md.push('\n');
    }

    let scripts = analysis.scan.scripts();
    if !scripts.is_empty() {
        md.push_str("#### Scripts and Automation\n\n");
        md.push_str("| Script | Type | Classification | Recommendation | LOC | Reasoning |\n");
        md.push_str("|--------|------|---------------|----------------|-----|----------|\n");
        for file in scripts {
            let Some(result) = classifications.get(&file.path) else {
                continue;
            };
            let category = file
                .script()
                .map(|s| s.category.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} | {} | {} |",
                file.name, category, result.classification, result.recommendation, file.lines_of_code, preview(&result.reasoning)
            );
        }
        md.push('\n');
    }

    md
}

#[derive(Default)]
struct ClassCounts {
    essential: usize,
    nice_to_have: usize,
    bloat: usize,
}

fn count_classes(files: &[&FileRecord], classifications: &ClassificationMap) -> ClassCounts {
    let mut counts = ClassCounts::default();
    for file in files {
        match classifications.get(&file.path).map(|r| r.classification) {
            Some(Classification::Essential) => counts.essential += 1,
            Some(Classification::NiceToHave) => counts.nice_to_have += 1,
            Some(Classification::Bloat) => counts.bloat += 1,
            None => {}
        }
    }
    counts
}

fn share(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn detailed_analysis(analysis: &ProjectAnalysis) -> String {
    let classifications = &analysis.classifications;
    let mut md = String::from("## Detailed Analysis\n\n### Component Analysis\n\n");

    let components = analysis.scan.components();
    if components.is_empty() {
        md.push_str("No React components found in the analysis.");
    } else {
        let counts = count_classes(&components, classifications);
        let complexities: Vec<usize> = components
            .iter()
            .filter_map(|f| f.component().map(|c| c.complexity))
            .collect();
        let average = if complexities.is_empty() {
            0.0
        } else {
            complexities.iter().sum::<usize>() as f64 / complexities.len() as f64
        };
        let high = complexities.iter().filter(|c| **c > HIGH_COMPLEXITY).count();

        let _ = write!(
            md,
            "**Total Components:** {}\n**Essential:** {} | **Nice-to-Have:** {} | **Bloat:** {}\n**Average Complexity:** {:.2}\n**High Complexity Components:** {}\n\n#### Key Findings:\n- {} components ({:.1}%) are classified as bloat\n- {} components have high complexity scores requiring simplification",
            components.len(),
            counts.essential,
            counts.nice_to_have,
            counts.bloat,
            average,
            high,
            counts.bloat,
            share(counts.bloat, components.len()),
            high
        );
    }

    md.push_str("\n\n### API Analysis\n\n");
    let apis = analysis.scan.apis();
    if apis.is_empty() {
        md.push_str("No API endpoints found in the analysis.");
    } else {
        let counts = count_classes(&apis, classifications);
        let _ = write!(
            md,
            "**Total API Endpoints:** {}\n**Essential:** {} | **Nice-to-Have:** {} | **Bloat:** {}\n\n#### Key Findings:\n- {} endpoints ({:.1}%) are classified as bloat",
            apis.len(),
            counts.essential,
            counts.nice_to_have,
            counts.bloat,
            counts.bloat,
            share(counts.bloat, apis.len())
        );
    }

    md.push_str("\n\n### Script Analysis\n\n");
    let scripts = analysis.scan.scripts();
    if scripts.is_empty() {
        md.push_str("No scripts found in the analysis.");
    } else {
        let counts = count_classes(&scripts, classifications);
        let _ = write!(
            md,
            "**Total Scripts:** {}\n**Essential:** {} | **Development:** {} | **Bloat:** {}\n\n#### Key Findings:\n- {} scripts ({:.1}%) are classified as bloat",
            scripts.len(),
            counts.essential,
            counts.nice_to_have,
            counts.bloat,
            counts.bloat,
            share(counts.bloat, scripts.len())
        );
    }

    md.push_str("\n\n### Configuration Analysis\n\n");
    let configs = analysis.scan.files_of_kind(FileKind::Config);
    let docs = analysis.scan.files_of_kind(FileKind::Documentation);
    let total = configs.len() + docs.len();
    if total == 0 {
        md.push_str("No configuration or documentation files found in the analysis.");
    } else {
        let combined: Vec<&FileRecord> = configs.iter().chain(docs.iter()).copied().collect();
        let counts = count_classes(&combined, classifications);
        let _ = write!(
            md,
            "**Total Config/Doc Files:** {}\n**Configuration Files:** {} | **Documentation Files:** {}\n**Essential:** {} | **Optional:** {} | **Bloat:** {}\n\n#### Key Findings:\n- {} files ({:.1}%) are classified as bloat",
            total,
            configs.len(),
            docs.len(),
            counts.essential,
            counts.nice_to_have,
            counts.bloat,
            counts.bloat,
            share(counts.bloat, total)
        );
    }

    md
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn recommendation_plan() -> RecommendationPlan {
    RecommendationPlan {
        immediate: owned(&[
            "Remove unused API endpoints and related backend logic",
            "Delete automation scripts for scraping and advanced monitoring",
            "Remove documentation for non-MVP features",
            "Clean up package.json dependencies",
        ]),
        short_term: owned(&[
            "Simplify high-complexity components",
            "Consolidate similar UI components",
            "Remove specialized sections outside the MVP scope",
            "Streamline build configurations",
        ]),
        long_term: owned(&[
            "Optimize remaining components for performance",
            "Implement comprehensive testing for core functionality",
            "Update documentation for the simplified architecture",
            "Monitor and measure complexity reduction benefits",
        ]),
    }
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn recommendations_section() -> String {
    let plan = recommendation_plan();
    format!(
        "## Recommendations\n\n### Immediate Actions (High Priority)\n\n{}\n\n### Short-term Actions (Medium Priority)\n\n{}\n\n### Long-term Actions (Low Priority)\n\n{}",
        bullets(&plan.immediate),
        bullets(&plan.short_term),
        bullets(&plan.long_term)
    )
}

fn risk_assessment(consistency_warnings: &[String]) -> String {
    let mut md = String::from(
        "## Risk Assessment

### Low Risk Removals
- Unused scripts and automation tools
- Documentation for non-MVP features
- Advanced monitoring and analytics components
- Specialized UI components with no dependents

### Medium Risk Changes
- Simplifying complex essential components
- Removing nice-to-have features with some usage
- Configuration simplification
- API endpoint consolidation

### High Risk Changes
- Database schema modifications
- Core authentication system changes
- Essential component modifications
- Build process changes

### Mitigation Strategies
- Implement changes incrementally with comprehensive testing
- Maintain git branches for each phase to enable rollback
- Validate core user journeys after each change
- Keep backup of removed features for potential restoration",
    );

    if !consistency_warnings.is_empty() {
        md.push_str("\n\n### Classification Inconsistencies\n\n");
        md.push_str(&bullets(consistency_warnings));
    }
    md
}

fn implementation_roadmap() -> String {
    "## Implementation Roadmap

### Phase 1: Low-Risk Cleanup (Week 1)
- Remove unused scripts and documentation
- Clean up package.json dependencies
- Remove advanced monitoring components
- Delete specialized sections outside the MVP scope

### Phase 2: Feature Simplification (Week 2)
- Simplify high-complexity essential components
- Remove advanced features from core components
- Consolidate similar UI components
- Streamline API endpoints

### Phase 3: Architecture Optimization (Week 3)
- Remove scraping infrastructure
- Simplify database schema
- Optimize build configurations
- Consolidate testing strategies

### Phase 4: Final Validation (Week 4)
- Comprehensive testing of core functionality
- Performance optimization
- Documentation updates
- Metrics collection and reporting"
        .to_string()
}

fn file_type_chart(analysis: &ProjectAnalysis) -> String {
    let total = analysis.summary.total_files;
    let mut chart = String::from("```\n");
    for (kind, files) in analysis.scan.files_by_kind() {
        let count = files.len();
        let bar = "█".repeat((count as f64 / 10.0).round() as usize);
        let _ = writeln!(
            chart,
            "{:<15} {:>4} ({:.1}%) {}",
            kind.as_str(),
            count,
            share(count, total),
            bar
        );
    }
    chart.push_str("```");
    chart
}

/// `1234567` → `1,234,567`.
fn with_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_uses_fixed_factors() {
        let summary = AnalysisSummary {
            total_files: 101,
            total_lines_of_code: 12_345,
            ..AnalysisSummary::default()
        };
        let stats = ReductionStatistics::project(&summary, 10, 5, 7);
        assert_eq!(stats.projected.total_files, 51);
        assert_eq!(stats.projected.total_lines_of_code, 6_173);
        assert_eq!(stats.projected.components, 7);
        assert_eq!(stats.projected.apis, 3);
        assert_eq!(stats.projected.scripts, 2);
        assert_eq!(stats.reduction.components, 30);
        assert_eq!(stats.reduction.scripts, 70);
        assert!(stats.note.contains("estimates"));
    }

    #[test]
    fn reasoning_preview_is_char_safe() {
        let long = "é".repeat(80);
        let short = preview(&long);
        assert_eq!(short.chars().count(), REASONING_PREVIEW_CHARS + 3);
    }

    #[test]
    fn formats_thousands() {
        assert_eq!(with_thousands(0), "0");
        assert_eq!(with_thousands(999), "999");
        assert_eq!(with_thousands(1_000), "1,000");
        assert_eq!(with_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn recommendation_plan_has_three_tiers() {
        let plan = recommendation_plan();
        assert_eq!(plan.immediate.len(), 4);
        assert_eq!(plan.short_term.len(), 4);
        assert_eq!(plan.long_term.len(), 4);
    }
}
