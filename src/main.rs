//! # funicular CLI Entry Point
//!
//! Parses CLI arguments using clap and routes commands to the library.
//!
//! ## Commands
//!
//! - `build` - compile the source tree into the `.mrb` artifact
//! - `watch` - rebuild whenever a source file changes
//! - `routes` - print the route table from `initializer.rb`
//! - `toolchain` - show which `picorbc` would be used
//! - `clean` - remove the artifact
//! - `completion` - shell completion scripts

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use std::path::{Path, PathBuf};
use tracing::Level;

use funicular::build::{self, ArtifactBuilder, BuildRequest, Compile};
use funicular::config::FunicularConfig;
use funicular::routes;
use funicular::telemetry;
use funicular::toolchain::ToolchainResolver;
use funicular::ui;

#[derive(Parser)]
#[command(name = "funicular")]
#[command(about = "Build Funicular apps into mruby bytecode", version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
struct Cli {
    /// Show debug-level logs
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long = "log-json", global = true)]
    log_json: bool,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the source tree into the .mrb artifact
    Build {
        /// Emit debug information (-g)
        #[arg(long)]
        debug: bool,
        /// Keep the synthesized environment marker next to the artifact
        #[arg(long)]
        keep_temp: bool,
    },
    /// Rebuild whenever a source file changes
    Watch,
    /// Print the routes declared in initializer.rb
    Routes {
        /// Route file to read instead of <source_dir>/initializer.rb
        #[arg(long)]
        file: Option<PathBuf>,
        /// Print routes as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show which picorbc would be used and its version
    Toolchain,
    /// Remove the compiled artifact
    Clean,
    /// Generate shell completion scripts
    Completion { shell: Shell },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    telemetry::init_tracing(cli.log_json, level);

    let root = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match &cli.command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
        Commands::Build { debug, keep_temp } => {
            let config = build::load_config(&root)?;
            run_build(&root, &config, *debug, *keep_temp)
        }
        Commands::Watch => {
            let config = build::load_config(&root)?;
            build::watch(&root, &config)
        }
        Commands::Routes { file, json } => {
            let config = build::load_config(&root)?;
            let path = match file {
                Some(file) => root.join(file),
                None => root.join(&config.app.source_dir).join("initializer.rb"),
            };
            print_routes(&path, *json)
        }
        Commands::Toolchain => {
            let config = build::load_config(&root)?;
            show_toolchain(&root, &config)
        }
        Commands::Clean => {
            let config = build::load_config(&root)?;
            build::clean(&root, &config).map(|_| ())
        }
    }
}

fn run_build(root: &Path, config: &FunicularConfig, debug: bool, keep_temp: bool) -> Result<()> {
    let mut builder = ArtifactBuilder::from_config(root, config);
    if keep_temp {
        builder = builder.keep_temp(true);
    }
    let request = BuildRequest {
        source_dir: root.join(&config.app.source_dir),
        output_path: root.join(&config.app.output),
        debug_mode: debug,
    };

    println!("{} Compiling Funicular application...", "⚙".blue());
    let result = builder.compile(&request)?;
    for warning in &result.diagnostics {
        println!("   {} {}", "⚠".yellow(), warning);
    }
    println!(
        "{} Successfully compiled to {}",
        "✓".green(),
        result.output_path.display()
    );
    Ok(())
}

fn print_routes(path: &Path, json: bool) -> Result<()> {
    if !path.exists() {
        println!(
            "No Funicular routes found ({} does not exist)",
            path.display()
        );
        return Ok(());
    }

    let routes = routes::parse_file(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&routes)?);
    } else if routes.is_empty() {
        println!("No routes defined");
    } else {
        print!("{}", ui::render_routes(&routes));
    }
    Ok(())
}

fn show_toolchain(root: &Path, config: &FunicularConfig) -> Result<()> {
    let resolver = ToolchainResolver::new(root, &config.toolchain);
    let mut warnings = Vec::new();
    let mut binary = resolver.resolve(&mut warnings)?;
    warnings.extend(resolver.check_version(&mut binary));

    println!("{} {}", "Path:".bold(), binary.invocation_path.display());
    println!("{} {}", "Origin:".bold(), binary.origin);
    println!(
        "{} {} (pinned {})",
        "Version:".bold(),
        binary.detected_version.as_deref().unwrap_or("unknown"),
        resolver.expected_version()
    );
    for warning in &warnings {
        println!("{} {}", "⚠".yellow(), warning);
    }
    Ok(())
}
