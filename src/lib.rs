pub mod types;
pub mod error;
pub mod config;
pub mod file_discovery;
pub mod simple_parser;
pub mod resolver;
pub mod scanner;
pub mod dependency_graph;
pub mod impact;
pub mod classifier;
pub mod visualizer;
pub mod dashboard;
pub mod analyzer;
pub mod reporter;

pub use analyzer::{Analyzer, ProjectAnalysis};
pub use classifier::{Classifier, ScoringPolicy};
pub use config::Config;
pub use dependency_graph::{DependencyGraph, GraphBuilder};
pub use error::AnalysisError;
pub use file_discovery::FileDiscovery;
pub use reporter::{ReportFormat, Reporter};
pub use resolver::{HeuristicResolver, ImportResolver};
pub use scanner::Scanner;
pub use simple_parser::SimpleParser;

pub type Result<T> = anyhow::Result<T>;
