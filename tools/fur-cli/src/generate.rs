//! Generate command - grow fur once and write it out

use anyhow::{Context, Result};
use clap::Args;
use furview_core::Fur;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{make_rng, FurArgs};
use crate::obj::{load_obj, write_lines_obj};
use crate::scene::ExportScene;

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Input mesh (.obj, triangles or quads)
    pub mesh: PathBuf,

    /// Output path for the fur lines (.obj)
    #[arg(short, long, default_value = "fur.obj")]
    pub output: PathBuf,

    #[command(flatten)]
    pub fur: FurArgs,
}

/// Execute the generate command
pub fn execute(args: GenerateArgs) -> Result<()> {
    let config = args.fur.resolve()?;
    let mesh = Arc::new(load_obj(&args.mesh)?);

    let fur = Fur::new(
        mesh,
        config.fur,
        config.material,
        ExportScene::new(),
        make_rng(&config),
    )?;

    let name = args
        .output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "fur".to_string());
    let model = fur
        .sink()
        .latest()
        .context("No fur model registered with the scene")?;
    write_lines_obj(model, &args.output, &name)
        .with_context(|| format!("Failed to write fur: {:?}", args.output))?;

    println!(
        "{} hairs ({} roots) written to {}",
        fur.lines().segment_count(),
        fur.roots().len(),
        args.output.display()
    );
    Ok(())
}
