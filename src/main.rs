use clap::{Parser, Subcommand};
use mvp_redundancy::{Analyzer, Config, ReportFormat, Reporter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mvp-redundancy")]
#[command(about = "Find files in a web codebase that exceed MVP scope and estimate the cost of removing them")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a project directory and write reports
    Analyze {
        /// Target directory to analyze
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory for reports (overrides the config file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format to generate
        #[arg(long, value_enum, default_value = "all")]
        format: ReportFormat,
    },
    /// Show what breaks if a file is removed
    Impact {
        /// File path relative to the project root
        file: String,

        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the tree of files depending on a root file
    Tree {
        /// Root file; defaults to the first file that imports nothing
        #[arg(long)]
        root: Option<String>,

        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print a Mermaid diagram of the most connected files
    Mermaid {
        #[arg(long)]
        max_nodes: Option<usize>,

        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Generate a documented configuration file
    Config {
        /// Output path for the config file (defaults to ~/.mvp-redundancy.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze { path, config, output, format } => {
            analyze_project(path, config, output, format).await
        }
        Commands::Impact { file, path, config } => show_impact(path, config, &file).await,
        Commands::Tree { root, path, config } => show_tree(path, config, root.as_deref()).await,
        Commands::Mermaid { max_nodes, path, config } => show_mermaid(path, config, max_nodes).await,
        Commands::Config { output } => generate_config(output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("❌ Analysis failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(target_path: PathBuf, config_path: Option<PathBuf>) -> anyhow::Result<Config> {
    let mut config = match config_path {
        Some(config_path) => Config::from_file(&config_path)?,
        None => Config::load()?,
    };
    config.target_directory = target_path;
    Ok(config)
}

async fn analyze_project(
    target_path: PathBuf,
    config_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    format: ReportFormat,
) -> anyhow::Result<()> {
    println!("🚀 Starting MVP Redundancy Analysis");
    println!("===================================");

    let start_time = Instant::now();

    let mut config = load_config(target_path, config_path)?;
    if let Some(output_path) = output_path {
        config.report.output_dir = output_path;
    }

    println!("🎯 Target directory: {}", config.target_directory.display());
    println!("📤 Output directory: {}", config.report.output_dir.display());

    let analyzer = Analyzer::new(config.clone())?;
    let analysis = analyzer.analyze_project().await?;

    println!();
    analysis.print_summary();

    println!("\n📊 Generating reports...");
    let reporter = Reporter::new(config.report.clone());
    let exported_files = reporter.export_report(&analysis, format)?;

    let duration = start_time.elapsed();
    println!("\n✅ Analysis completed in {:.2}s", duration.as_secs_f64());
    println!("📁 Reports exported to:");
    for file in exported_files {
        println!("   - {}", file.display());
    }

    Ok(())
}

async fn show_impact(target_path: PathBuf, config_path: Option<PathBuf>, file: &str) -> anyhow::Result<()> {
    let config = load_config(target_path, config_path)?;
    let analysis = Analyzer::new(config)?.analyze_project().await?;

    if analysis.graph.node(file).is_none() {
        println!("⚠️  {} is not part of the scanned file set", file);
    }

    let impact = analysis.impact(file);
    println!("\n💥 Removal impact for {}", impact.target);
    println!("  Risk level: {}", impact.risk_level);
    println!("  Affected files: {}", impact.affected_files.len());
    for affected in &impact.affected_files {
        println!("    - {}", affected);
    }
    if !impact.cascade_effects.is_empty() {
        println!("  Cascade:");
        for effect in &impact.cascade_effects {
            println!("    - {}", effect);
        }
    }
    if !impact.mitigation_steps.is_empty() {
        println!("  Mitigation:");
        for step in &impact.mitigation_steps {
            println!("    • {}", step);
        }
    }
    Ok(())
}

async fn show_tree(target_path: PathBuf, config_path: Option<PathBuf>, root: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(target_path, config_path)?;
    let analysis = Analyzer::new(config)?.analyze_project().await?;
    print!("{}", analysis.visualizer().dependency_tree(root));
    println!();
    Ok(())
}

async fn show_mermaid(
    target_path: PathBuf,
    config_path: Option<PathBuf>,
    max_nodes: Option<usize>,
) -> anyhow::Result<()> {
    let config = load_config(target_path, config_path)?;
    let max_nodes = max_nodes.unwrap_or(config.report.mermaid_max_nodes);
    let analysis = Analyzer::new(config)?.analyze_project().await?;
    print!("{}", analysis.visualizer().mermaid_diagram(max_nodes));
    Ok(())
}

fn generate_config(output_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config_path = match output_path {
        Some(path) => path,
        None => Config::default_config_path()?,
    };

    println!("📝 Generating configuration file: {}", config_path.display());
    std::fs::write(&config_path, Config::create_documented_config())?;

    println!("✅ Configuration file created successfully!");
    println!("💡 Edit the file to customize your analysis settings.");
    println!();
    println!("🔧 Key configuration areas:");
    println!("  • Directories to skip and extensions to scan");
    println!("  • Report output directory and sections");
    println!("  • Scoring weights, thresholds and keyword sets");
    Ok(())
}
