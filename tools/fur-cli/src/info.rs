//! Info command - mesh statistics and predicted fur size

use anyhow::Result;
use clap::Args;
use furview_core::{centroid_count, expected_root_count};
use std::path::PathBuf;

use crate::config::FurArgs;
use crate::obj::load_obj;

/// Arguments for the info command
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Input mesh (.obj)
    pub mesh: PathBuf,

    #[command(flatten)]
    pub fur: FurArgs,
}

/// Execute the info command
pub fn execute(args: InfoArgs) -> Result<()> {
    let config = args.fur.resolve()?;
    let mesh = load_obj(&args.mesh)?;
    let arity = mesh.faces().arity();

    println!("Mesh: {}", args.mesh.display());
    println!("  vertices:        {}", mesh.vertex_count());
    println!("  faces:           {}", mesh.face_count());
    println!("  corners/face:    {}", arity);
    println!("Fur at density {}:", config.fur.density);
    println!("  bulbs per face:  {}", centroid_count(arity, config.fur.density));
    println!("  hair roots:      {}", expected_root_count(&mesh, config.fur.density));
    println!("Roots by density:");
    for density in config.limits.density_min..=config.limits.density_max {
        println!("  {:>2}: {}", density, expected_root_count(&mesh, density));
    }
    Ok(())
}
