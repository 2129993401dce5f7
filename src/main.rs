use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::prelude::*;
use xpath_locator::{absolute_xpath, element_info, CandidateGenerator};
use xpath_picker::config::{default_config_path, PickerConfig};
use xpath_picker::output::render_structured;
use xpath_picker::{
    load_document, resolve_target, Direction, EvalReport, OutputFormat, SelectionController,
    SelectionReport,
};

/// XPath Picker - ranked XPath candidates for page elements
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (defaults to the configured level, then "info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long)]
    debug: bool,

    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every candidate for the target element
    Candidates(CandidatesArgs),

    /// Print the single preferred expression for the target element
    Best(TargetArgs),

    /// Print the absolute and structural paths of the target element
    Absolute(TargetArgs),

    /// Evaluate an expression against the document
    Eval(EvalArgs),

    /// Show build and configuration information
    Info,
}

#[derive(Args)]
struct TargetArgs {
    /// Markup file to load (well-formed XHTML/XML)
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Expression selecting exactly one element
    #[arg(short, long, value_name = "XPATH")]
    target: String,
}

#[derive(Args)]
struct CandidatesArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Navigation steps applied after selecting the target, in order
    #[arg(short, long, value_enum, value_delimiter = ',')]
    walk: Vec<Direction>,

    /// Record candidate N (1-based) as chosen and print only its expression
    #[arg(long, value_name = "N")]
    choose: Option<usize>,
}

#[derive(Args)]
struct EvalArgs {
    /// Markup file to load (well-formed XHTML/XML)
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Expression to evaluate
    xpath: String,
}

#[derive(Serialize)]
struct PathReport {
    xpath: String,
}

#[derive(Serialize)]
struct AbsoluteReport {
    absolute: String,
    smart: String,
}

#[derive(Serialize)]
struct InfoReport {
    version: &'static str,
    build_date: &'static str,
    git_hash: &'static str,
    git_branch: &'static str,
    config_path: Option<PathBuf>,
    config: PickerConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => default_config_path().ok(),
    };
    let config = match &config_path {
        Some(path) => PickerConfig::load(Some(path.as_path()))?,
        None => PickerConfig::default(),
    };

    let level = cli
        .log_level
        .clone()
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| "info".to_string());
    init_logging(&level, cli.debug)?;
    debug!("Starting xpath-picker v{}", env!("CARGO_PKG_VERSION"));

    let output = cli.output.unwrap_or(config.output.format);

    let result = match cli.command {
        Commands::Candidates(args) => cmd_candidates(args, &config, output),
        Commands::Best(args) => cmd_best(args, &config, output),
        Commands::Absolute(args) => cmd_absolute(args, &config, output),
        Commands::Eval(args) => cmd_eval(args, &config, output),
        Commands::Info => cmd_info(config_path, config, output),
    };

    match result {
        Ok(()) => {
            debug!("Command completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

fn emit<T: Serialize>(value: &T, output: OutputFormat, human: impl FnOnce() -> String) -> Result<()> {
    match render_structured(value, output)? {
        Some(rendered) => println!("{}", rendered.trim_end()),
        None => print!("{}", human()),
    }
    Ok(())
}

fn cmd_candidates(args: CandidatesArgs, config: &PickerConfig, output: OutputFormat) -> Result<()> {
    let document = load_document(&args.target.file)
        .with_context(|| format!("Failed to load {}", args.target.file.display()))?;
    let target = resolve_target(&document, &args.target.target)?;

    let mut controller = SelectionController::with_options(&document, config.generator.clone());
    controller.activate();
    controller.hover(target.node_id());
    if !controller.select(target.node_id())? {
        bail!("target '{}' belongs to the picker UI", args.target.target);
    }
    for direction in &args.walk {
        let node = controller
            .navigate(*direction)
            .with_context(|| format!("Failed to navigate {:?}", direction))?;
        debug!("navigated {:?} to node {}", direction, node.index());
    }

    if let Some(number) = args.choose {
        let index = number.checked_sub(1).context("Candidate numbers start at 1")?;
        let chosen = controller.choose(index)?;
        info!("Chose {} candidate", chosen.label());
        let report = PathReport {
            xpath: chosen.xpath.clone(),
        };
        return emit(&report, output, || format!("{}\n", report.xpath));
    }

    let selection = controller
        .selection()
        .context("No element selected after navigation")?;
    let report = SelectionReport {
        info: selection.info.clone(),
        element: selection.summary.clone(),
        candidates: selection.candidates.clone(),
    };
    emit(&report, output, || report.to_human())
}

fn cmd_best(args: TargetArgs, config: &PickerConfig, output: OutputFormat) -> Result<()> {
    let document = load_document(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let target = resolve_target(&document, &args.target)?;

    let generator = CandidateGenerator::with_options(&document, config.generator.clone());
    let report = PathReport {
        xpath: generator.best_xpath(&target),
    };
    emit(&report, output, || format!("{}\n", report.xpath))
}

fn cmd_absolute(args: TargetArgs, config: &PickerConfig, output: OutputFormat) -> Result<()> {
    let document = load_document(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let target = resolve_target(&document, &args.target)?;

    let generator = CandidateGenerator::with_options(&document, config.generator.clone());
    let report = AbsoluteReport {
        absolute: absolute_xpath(&target),
        smart: generator.smart_path(&target),
    };
    emit(&report, output, || {
        format!("Absolute: {}\nSmart:    {}\n", report.absolute, report.smart)
    })
}

fn cmd_eval(args: EvalArgs, config: &PickerConfig, output: OutputFormat) -> Result<()> {
    let document = load_document(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let nodes = document
        .select(&args.xpath)
        .with_context(|| format!("Failed to evaluate '{}'", args.xpath))?;

    let matches = nodes
        .iter()
        .map(|node| match document.element(*node) {
            Some(element) => element_info(&element, &config.generator),
            None if *node == document.root() => "/".to_string(),
            None => format!("text {:?}", document.string_value(*node)),
        })
        .collect();
    let report = EvalReport {
        xpath: args.xpath,
        count: nodes.len(),
        matches,
    };
    emit(&report, output, || report.to_human())
}

fn cmd_info(config_path: Option<PathBuf>, config: PickerConfig, output: OutputFormat) -> Result<()> {
    let report = InfoReport {
        version: env!("CARGO_PKG_VERSION"),
        build_date: env!("BUILD_DATE"),
        git_hash: env!("GIT_HASH"),
        git_branch: env!("GIT_BRANCH"),
        config_path,
        config,
    };
    emit(&report, output, || {
        let mut out = String::new();
        out.push_str("XPath Picker Information\n");
        out.push_str("========================\n");
        out.push_str(&format!("Version: {}\n", report.version));
        out.push_str(&format!("Build Date: {}\n", report.build_date));
        out.push_str(&format!(
            "Git Commit: {} ({})\n\n",
            report.git_hash, report.git_branch
        ));
        out.push_str("Configuration:\n");
        match &report.config_path {
            Some(path) => out.push_str(&format!("- Config File: {}\n", path.display())),
            None => out.push_str("- Config File: (none)\n"),
        }
        let generator = &report.config.generator;
        out.push_str(&format!(
            "- Attributes: {}\n",
            generator.attribute_names.join(", ")
        ));
        out.push_str(&format!(
            "- Transient Classes: {}\n",
            generator.transient_classes.join(", ")
        ));
        out.push_str(&format!("- Text Limit: {} chars\n", generator.text_max_len));
        out
    })
}
