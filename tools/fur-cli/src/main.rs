//! Furview - procedural fur for OBJ meshes
//!
//! # Commands
//!
//! - `furview generate` - Grow fur on a mesh and write the hair lines as OBJ
//! - `furview session` - Tune fur interactively from the keyboard
//! - `furview info` - Print mesh statistics and predicted hair counts
//! - `furview config` - Print (or save) the resolved configuration
//!
//! # Usage
//!
//! ```bash
//! # Dense, long fur with a fixed seed
//! furview generate models/torus.obj -o torus_fur.obj --density 4 --length 0.2 --seed 7
//!
//! # Interactive: type l/k/m/n/b/v then w to write, q to quit
//! furview session models/torus.obj -o torus_fur.obj
//! ```
//!
//! # Config (config.toml)
//!
//! ```toml
//! seed = 42
//!
//! [fur]
//! length = 0.1
//! density = 3
//! orientation = "normal"
//!
//! [limits]
//! density_max = 8
//! ```

mod config;
mod generate;
mod info;
mod obj;
mod scene;
mod session;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Furview - procedural fur for OBJ meshes
#[derive(Parser)]
#[command(name = "furview")]
#[command(about = "Grow procedural fur on OBJ meshes")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grow fur on a mesh and write the hair lines as OBJ
    Generate(generate::GenerateArgs),

    /// Tune fur interactively from the keyboard
    Session(session::SessionArgs),

    /// Print mesh statistics and predicted hair counts
    Info(info::InfoArgs),

    /// Print the resolved configuration
    Config(ConfigArgs),
}

/// Arguments for the config command
#[derive(Args)]
struct ConfigArgs {
    #[command(flatten)]
    fur: config::FurArgs,

    /// Save to this path (or the default config path when given without a value)
    #[arg(long, num_args = 0..=1)]
    save: Option<Option<PathBuf>>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command {
        Commands::Generate(args) => generate::execute(args),
        Commands::Session(args) => session::execute(args),
        Commands::Info(args) => info::execute(args),
        Commands::Config(args) => run_config(args),
    }
}

fn run_config(args: ConfigArgs) -> Result<()> {
    let resolved = args.fur.resolve()?;
    match args.save {
        Some(path) => {
            let path = match path.or_else(|| config::config_dir().map(|d| d.join("config.toml"))) {
                Some(path) => path,
                None => anyhow::bail!("No config directory available; pass a path to --save"),
            };
            config::save_to(&resolved, &path)?;
            println!("Saved config to {}", path.display());
        }
        None => print!("{}", toml::to_string_pretty(&resolved)?),
    }
    Ok(())
}
