//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use nbgallery_core::assembler::ArtifactMeta;
use nbgallery_core::pipeline::{BuildReport, ProgressReporter, build_gallery, scan_gallery};
use nbgallery_shared::{
    AppConfig, CONFIG_FILE_NAME, GallerySettings, init_config, load_config, load_config_from,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// nbgallery: turn marked notebook plots into a gallery page.
#[derive(Parser)]
#[command(
    name = "nbgallery",
    version,
    about = "Build a Quarto gallery page from plots marked in Jupyter notebooks.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (a missing file means defaults).
    #[arg(long, global = true, env = "NBGALLERY_CONFIG", default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build the gallery page and its thumbnails.
    Build {
        /// Documentation source directory (overrides `paths.source_dir`).
        #[arg(long)]
        source_dir: Option<PathBuf>,
    },

    /// List the images a build would place, without writing anything.
    Scan {
        /// Documentation source directory (overrides `paths.source_dir`).
        #[arg(long)]
        source_dir: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "nbgallery=info",
        1 => "nbgallery=debug",
        _ => "nbgallery=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build { source_dir } => cmd_build(&cli.config, source_dir.as_deref()),
        Command::Scan { source_dir } => cmd_scan(&cli.config, source_dir.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(&cli.config),
            ConfigAction::Show => cmd_config_show(&cli.config),
        },
    }
}

/// Load the config and resolve it against the config file's directory.
fn resolve_settings(config_path: &Path, source_dir: Option<&Path>) -> Result<GallerySettings> {
    let mut config = load_config(config_path)?;
    let base_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    if let Some(dir) = source_dir {
        let cwd = std::env::current_dir()
            .map_err(|e| eyre!("cannot determine working directory: {e}"))?;
        config.paths.source_dir = cwd.join(dir).to_string_lossy().into_owned();
    }

    Ok(GallerySettings::resolve(&config, base_dir)?)
}

fn cmd_build(config_path: &Path, source_dir: Option<&Path>) -> Result<()> {
    let settings = resolve_settings(config_path, source_dir)?;
    info!(source = %settings.source_dir.display(), "building gallery");

    let reporter = CliProgress::new();
    let report = match build_gallery(&settings, &reporter) {
        Ok(report) => report,
        Err(e) => {
            reporter.spinner.finish_and_clear();
            return Err(e.into());
        }
    };

    println!();
    println!("  Gallery built successfully!");
    println!("  Notebooks: {}", report.notebooks);
    println!("  Images:    {}", report.images);
    for (title, count) in &report.sections {
        println!("    {title}: {count}");
    }
    println!("  Page:      {}", report.page_path.display());
    println!("  Time:      {:.1}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_scan(config_path: &Path, source_dir: Option<&Path>) -> Result<()> {
    let settings = resolve_settings(config_path, source_dir)?;
    let report = scan_gallery(&settings, &nbgallery_core::pipeline::SilentProgress)?;

    for section in &report.sections {
        for image in &section.images {
            println!("{}\t{}\t{}", section.title, image.title, image.target);
        }
    }
    info!(
        notebooks = report.notebooks,
        images = report.image_count(),
        "scan complete"
    );

    Ok(())
}

fn cmd_config_init(path: &Path) -> Result<()> {
    init_config(path)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: &Path) -> Result<()> {
    let config: AppConfig = if path.exists() {
        load_config_from(path)?
    } else {
        AppConfig::default()
    };
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn image_staged(&self, title: &str, current: usize) {
        self.spinner
            .set_message(format!("Extracting [{current}] {title}"));
    }

    fn artifact_written(&self, artifact: &ArtifactMeta) {
        self.spinner
            .set_message(format!("Wrote {}", artifact.path.display()));
    }

    fn done(&self, _report: &BuildReport) {
        self.spinner.finish_and_clear();
    }
}
