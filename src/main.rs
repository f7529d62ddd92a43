use clap::{Parser, Subcommand};
use sitepipe::project::Project;
use sitepipe::tasks::{self, OnError, SequenceReport, Task};
use sitepipe::{config, output, scan, utilities, watch};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sitepipe")]
#[command(about = "Static site builder with a CSS/JS asset pipeline")]
#[command(long_about = "\
Static site builder with a CSS/JS asset pipeline

Pages are Markdown or templates rendered through shared layouts. CSS is
bundled from one entry point and extended with generated utility classes.
Scripts are lowered to the configured syntax level and concatenated into
one bundle.

Project structure:

  sitepipe.toml                    # Project config (optional)
  utilities.toml                   # Utility class theme (optional)
  site/
  ├── index.md                     # → dist/index.html
  ├── about.md                     # → dist/about/index.html
  ├── blog/blog.md                 # → dist/blog/index.html
  ├── includes/layouts/base.njk    # Layout, selected with `layout: base`
  ├── data/site.json               # Available to every page as `site`
  ├── css/main.css                 # → dist/css/main.css (+ main.min.css)
  ├── js/*.js                      # → dist/js/main.js (+ main.min.js)
  ├── images/                      # Copied verbatim
  └── fonts/                       # Copied verbatim

Sequences:
  dev     content → passthrough → css → js, then watch for changes
  build   content → passthrough → css → css minify → js → js minify

Run 'sitepipe gen-config' to generate a documented sitepipe.toml.")]
#[command(version)]
struct Cli {
    /// Project root
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Log progress (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build for development, then rebuild on every change (default)
    Dev,
    /// Run the full production sequence once
    Build,
    /// Render content and copy static files
    Render,
    /// Compile and minify the stylesheet
    Css,
    /// Bundle and minify the scripts
    Js,
    /// Validate config and list content without writing anything
    Check,
    /// Print a stock config file with all options documented
    GenConfig {
        /// Print utilities.toml instead of sitepipe.toml
        #[arg(long)]
        utilities: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command.unwrap_or(Command::Dev) {
        Command::Dev => {
            let project = load(&cli.root)?;
            println!("==> Development build: {}", project.root().display());
            tasks::run_sequence(&project, tasks::DEV, OnError::Continue);

            let running = Arc::new(AtomicBool::new(true));
            let flag = running.clone();
            ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))?;
            watch::run(&project, running)?;
            println!("==> Stopped watching");
        }
        Command::Build => {
            let project = load(&cli.root)?;
            println!("==> Production build: {}", project.root().display());
            let report = tasks::run_sequence(&project, tasks::BUILD, OnError::Halt);
            finish(&report, "Build", &project);
        }
        Command::Render => {
            let project = load(&cli.root)?;
            let report = tasks::run_sequence(
                &project,
                &[Task::RenderContent, Task::CopyPassthrough],
                OnError::Halt,
            );
            finish(&report, "Render", &project);
        }
        Command::Css => {
            let project = load(&cli.root)?;
            let report =
                tasks::run_sequence(&project, &[Task::CompileCss, Task::MinifyCss], OnError::Halt);
            finish(&report, "CSS", &project);
        }
        Command::Js => {
            let project = load(&cli.root)?;
            let report =
                tasks::run_sequence(&project, &[Task::CompileJs, Task::MinifyJs], OnError::Halt);
            finish(&report, "JS", &project);
        }
        Command::Check => {
            let project = Project::load(&cli.root)?;
            println!("==> Checking {}", project.root().display());
            utilities::UtilityEngine::load(&project)?;
            let content = scan::scan(&project)?;
            output::print_scan_output(&content, &project);
            println!("==> Project is valid");
        }
        Command::GenConfig { utilities: true } => {
            print!("{}", utilities::stock_utilities_toml());
        }
        Command::GenConfig { utilities: false } => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `-v` forces `info`; otherwise `RUST_LOG`, falling back to `warn`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the project and size the rendering pool from its config.
fn load(root: &std::path::Path) -> Result<Project, config::ConfigError> {
    let project = Project::load(root)?;
    init_thread_pool(&project.config.processing);
    Ok(project)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Never more threads than CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Print the closing line and exit non-zero if any task failed.
fn finish(report: &SequenceReport, what: &str, project: &Project) {
    if report.is_ok() {
        println!("==> {} complete: {}", what, project.output_dir().display());
        return;
    }
    let skipped: Vec<&str> = report.skipped.iter().map(|t| t.stage()).collect();
    if skipped.is_empty() {
        eprintln!("==> {} failed", what);
    } else {
        eprintln!("==> {} failed, skipped: {}", what, skipped.join(", "));
    }
    std::process::exit(1);
}
