use crate::{
    classifier::{validate_classification_consistency, Classifier},
    config::Config,
    dashboard::FileTable,
    dependency_graph::{DependencyAnalysis, DependencyGraph, GraphBuilder},
    error::AnalysisError,
    impact::{analyze_removal_impact, detect_unused_dependencies_in, UnusedDependency},
    resolver::{HeuristicResolver, ImportResolver},
    scanner::Scanner,
    types::{
        AnalysisSummary, Classification, ClassificationMap, ImpactAnalysis, Recommendation,
        ScanResult,
    },
    visualizer::DependencyVisualizer,
    Result,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Runs scan, graph, classification and dependency analysis in order.
pub struct Analyzer {
    config: Config,
    resolver: Arc<dyn ImportResolver>,
}

impl Analyzer {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            resolver: Arc::new(HeuristicResolver::new()),
        })
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn ImportResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs every stage on one blocking task. Any failure is logged here
    /// before it is returned, and no partial analysis is kept.
    pub async fn analyze_project(&self) -> Result<ProjectAnalysis> {
        let config = self.config.clone();
        let resolver = Arc::clone(&self.resolver);

        let outcome = tokio::task::spawn_blocking(move || run_pipeline(&config, resolver))
            .await
            .map_err(anyhow::Error::from)
            .and_then(|result| result.map_err(anyhow::Error::from));

        if let Err(err) = &outcome {
            error!("Analysis aborted: {:#}", err);
        }
        outcome
    }
}

fn run_pipeline(
    config: &Config,
    resolver: Arc<dyn ImportResolver>,
) -> std::result::Result<ProjectAnalysis, AnalysisError> {
    let root = config.target_directory.clone();

    info!("Scanning codebase...");
    let scan = Scanner::with_resolver(config.scan.clone(), Arc::clone(&resolver))?.scan(&root)?;
    if !scan.warnings.is_empty() {
        warn!("{} files could not be read and were skipped", scan.warnings.len());
    }
    info!(
        "Scanned {} files ({} lines of code)",
        scan.total_files, scan.total_lines_of_code
    );

    info!("Building dependency graph...");
    let graph = GraphBuilder::with_resolver(resolver).build_graph(&scan.files);

    info!("Classifying files...");
    let classifier = Classifier::new(config.scoring.clone());
    let classifications = classifier.classify_files(&scan.files);

    info!("Validating classifications...");
    let consistency_warnings = validate_classification_consistency(&scan.files, &classifications);
    for message in &consistency_warnings {
        warn!("{}", message);
    }

    info!("Analyzing dependencies...");
    let unused_dependencies = detect_unused_dependencies_in(&root, &scan.files);
    let dependency_analysis = graph.export_analysis(unused_dependencies.len());

    let summary = summarize(&scan, &classifications);
    info!("Analysis complete");

    Ok(ProjectAnalysis {
        root,
        scan,
        graph,
        classifications,
        consistency_warnings,
        dependency_analysis,
        unused_dependencies,
        summary,
    })
}

pub fn summarize(scan: &ScanResult, classifications: &ClassificationMap) -> AnalysisSummary {
    let mut summary = AnalysisSummary {
        total_files: scan.total_files,
        total_lines_of_code: scan.total_lines_of_code,
        ..AnalysisSummary::default()
    };

    for result in classifications.values() {
        match result.classification {
            Classification::Essential => summary.essential_files += 1,
            Classification::NiceToHave => summary.nice_to_have_files += 1,
            Classification::Bloat => summary.bloat_files += 1,
        }
        match result.recommendation {
            Recommendation::Remove => summary.removal_candidates += 1,
            Recommendation::Simplify => summary.simplification_candidates += 1,
            _ => {}
        }
    }
    summary
}

#[derive(Debug)]
pub struct ProjectAnalysis {
    pub root: PathBuf,
    pub scan: ScanResult,
    pub graph: DependencyGraph,
    pub classifications: ClassificationMap,
    pub consistency_warnings: Vec<String>,
    pub dependency_analysis: DependencyAnalysis,
    pub unused_dependencies: Vec<UnusedDependency>,
    pub summary: AnalysisSummary,
}

impl ProjectAnalysis {
    pub fn impact(&self, target: &str) -> ImpactAnalysis {
        analyze_removal_impact(&self.graph, target)
    }

    pub fn visualizer(&self) -> DependencyVisualizer<'_> {
        DependencyVisualizer::new(&self.graph, &self.classifications)
    }

    pub fn file_table(&self) -> FileTable<'_> {
        FileTable::new(&self.scan, &self.classifications)
    }

    pub fn print_summary(&self) {
        let s = &self.summary;
        println!("📊 MVP Redundancy Analysis Summary");
        println!("==================================");

        println!("\n📁 Files:");
        println!("  Total files: {}", s.total_files);
        println!("  Lines of code: {}", s.total_lines_of_code);
        if !self.scan.warnings.is_empty() {
            println!("  Skipped (unreadable): {}", self.scan.warnings.len());
        }

        println!("\n🏷️  Classification:");
        println!("  Essential: {} ({:.1}%)", s.essential_files, s.percent_of_total(s.essential_files));
        println!("  Nice-to-Have: {} ({:.1}%)", s.nice_to_have_files, s.percent_of_total(s.nice_to_have_files));
        println!("  Bloat: {} ({:.1}%)", s.bloat_files, s.percent_of_total(s.bloat_files));
        println!("  Removal candidates: {}", s.removal_candidates);
        println!("  Simplification candidates: {}", s.simplification_candidates);

        println!("\n🔗 Dependencies:");
        self.dependency_analysis.print_summary();

        if !self.consistency_warnings.is_empty() {
            println!("\n⚠️  Classification inconsistencies: {}", self.consistency_warnings.len());
            for message in &self.consistency_warnings {
                println!("  • {}", message);
            }
        }
    }
}
