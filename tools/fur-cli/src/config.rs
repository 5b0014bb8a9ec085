//! Configuration loading (~/.config/Furview/config.toml)
//!
//! An explicit `--config` path must exist and parse. The default file is
//! optional: a missing file means defaults, an unreadable one is logged and
//! ignored.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use furview_core::{Config, Orientation};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::path::{Path, PathBuf};

/// Hair direction as given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrientationArg {
    /// Follow each root's normal
    Normal,
    /// Comb every hair along one shared normal
    Shared,
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Normal => Orientation::Normal,
            OrientationArg::Shared => Orientation::Shared,
        }
    }
}

/// Fur options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct FurArgs {
    /// Path to a config.toml (defaults to the platform config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Subdivision density (overrides config)
    #[arg(short, long)]
    pub density: Option<u32>,

    /// Base hair length (overrides config)
    #[arg(short, long)]
    pub length: Option<f32>,

    /// Hair orientation (overrides config)
    #[arg(long, value_enum)]
    pub orientation: Option<OrientationArg>,

    /// Random seed for reproducible fur (overrides config)
    #[arg(long)]
    pub seed: Option<u64>,
}

impl FurArgs {
    /// Load the config file and apply command-line overrides.
    pub fn resolve(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => load_from(path)?,
            None => load(),
        };

        if let Some(density) = self.density {
            config.fur.density = density;
        }
        if let Some(length) = self.length {
            config.fur.length = length;
        }
        if let Some(orientation) = self.orientation {
            config.fur.orientation = orientation.into();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate().context("Invalid fur settings")?;
        Ok(config)
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Linux: `~/.config/Furview`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io", "furview", "Furview")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Load the default config file, falling back to defaults.
pub fn load() -> Config {
    let Some(path) = config_dir().map(|dir| dir.join("config.toml")) else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring config {:?}: {:#}", path, e);
            Config::default()
        }
    }
}

/// Load a config file that must exist.
pub fn load_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {:?}", path))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config: {:?}", path))
}

/// Write `config` as TOML to `path`, creating parent directories.
pub fn save_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {:?}", dir))?;
    }
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write config: {:?}", path))
}

/// Random source for a run: seeded from config, else from entropy.
pub fn make_rng(config: &Config) -> Pcg64 {
    let seed = config.seed.unwrap_or_else(rand::random::<u64>);
    tracing::info!("Using random seed {}", seed);
    Pcg64::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "seed = 3\n[fur]\ndensity = 2\nlength = 0.3\n").unwrap();

        let args = FurArgs {
            config: Some(path),
            density: Some(5),
            orientation: Some(OrientationArg::Shared),
            ..FurArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.fur.density, 5);
        assert!((config.fur.length - 0.3).abs() < 1e-6);
        assert_eq!(config.fur.orientation, Orientation::Shared);
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn test_resolve_rejects_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let args = FurArgs {
            config: Some(path),
            length: Some(5.0),
            ..FurArgs::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let args = FurArgs {
            config: Some(dir.path().join("missing.toml")),
            ..FurArgs::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_explicit_config_must_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[fur\n").unwrap();
        assert!(load_from(&path).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.fur.density = 6;
        config.seed = Some(99);

        save_to(&config, &path).unwrap();
        assert_eq!(load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_same_seed_same_rng() {
        use rand::Rng;
        let config = Config {
            seed: Some(12),
            ..Config::default()
        };
        let a: u64 = make_rng(&config).random();
        let b: u64 = make_rng(&config).random();
        assert_eq!(a, b);
    }
}
