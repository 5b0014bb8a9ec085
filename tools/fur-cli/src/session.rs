//! Session command - interactive fur tuning from the keyboard
//!
//! Reads one key per line from stdin:
//!
//! | Key | Action                          |
//! |-----|---------------------------------|
//! | `l` | longer hair                     |
//! | `k` | shorter hair                    |
//! | `m` | denser fur                      |
//! | `n` | sparser fur                     |
//! | `b` | comb all hair one random way    |
//! | `v` | hair follows surface normals    |
//! | `w` | write the current fur           |
//! | `q` | write and quit                  |

use anyhow::{Context, Result};
use clap::Args;
use furview_core::{Fur, FurControl, Limits};
use rand_pcg::Pcg64;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{make_rng, FurArgs};
use crate::obj::{load_obj, write_lines_obj};
use crate::scene::ExportScene;

/// Arguments for the session command
#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Input mesh (.obj, triangles or quads)
    pub mesh: PathBuf,

    /// Output path for the fur lines (.obj)
    #[arg(short, long, default_value = "fur.obj")]
    pub output: PathBuf,

    #[command(flatten)]
    pub fur: FurArgs,
}

/// What the command loop should do after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading
    Continue,
    /// Stop reading
    Quit,
}

/// Live fur plus where to write it.
pub struct Session {
    fur: Fur<ExportScene, Pcg64>,
    limits: Limits,
    output: PathBuf,
    writes: usize,
}

impl Session {
    /// Wrap a fur object for interactive editing
    pub fn new(fur: Fur<ExportScene, Pcg64>, limits: Limits, output: PathBuf) -> Self {
        Self {
            fur,
            limits,
            output,
            writes: 0,
        }
    }

    /// Fur being edited
    pub fn fur(&self) -> &Fur<ExportScene, Pcg64> {
        &self.fur
    }

    /// Number of times the fur was written out
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Handle one line of input.
    pub fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let key = line.trim().to_ascii_lowercase();
        match key.as_str() {
            "" => {}
            "q" => return Ok(Flow::Quit),
            "w" => self.write()?,
            "h" | "?" => print_help(),
            _ => match FurControl::from_key(&key) {
                Some(control) => {
                    if self.fur.apply(control, &self.limits)? {
                        let settings = self.fur.settings();
                        println!(
                            "length {:.2}, density {}, {:?}: {} hairs",
                            settings.length,
                            settings.density,
                            settings.orientation,
                            self.fur.lines().segment_count()
                        );
                    } else {
                        tracing::info!("{:?} ignored: already at limit", control);
                    }
                }
                None => tracing::warn!("Unknown key '{}', press h for help", key),
            },
        }
        Ok(Flow::Continue)
    }

    /// Run the command loop until `q` or end of input, then write once.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        for line in input.lines() {
            let line = line.context("Failed to read input")?;
            if self.handle_line(&line)? == Flow::Quit {
                break;
            }
        }
        self.write()
    }

    fn write(&mut self) -> Result<()> {
        let name = self
            .output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "fur".to_string());
        write_lines_obj(self.fur.model(), &self.output, &name)
            .with_context(|| format!("Failed to write fur: {:?}", self.output))?;
        self.writes += 1;
        Ok(())
    }
}

fn print_help() {
    println!("l/k: length +/-   m/n: density +/-   b: combed   v: normals   w: write   q: quit");
}

/// Execute the session command
pub fn execute(args: SessionArgs) -> Result<()> {
    let config = args.fur.resolve()?;
    let mesh = Arc::new(load_obj(&args.mesh)?);
    let fur = Fur::new(
        mesh,
        config.fur,
        config.material,
        ExportScene::new(),
        make_rng(&config),
    )?;

    let mut session = Session::new(fur, config.limits, args.output);
    print_help();
    session.run(std::io::stdin().lock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use furview_core::{BaseMesh, Faces, FurSettings, Material, Orientation};
    use glam::Vec3;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn session(output: PathBuf) -> Session {
        let mesh = BaseMesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
            None,
            Faces::Quads(vec![[0, 1, 2, 3]]),
        )
        .unwrap();
        let fur = Fur::new(
            Arc::new(mesh),
            FurSettings::default(),
            Material::default(),
            ExportScene::new(),
            Pcg64::seed_from_u64(21),
        )
        .unwrap();
        Session::new(fur, Limits::default(), output)
    }

    #[test]
    fn test_keys_drive_fur() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path().join("fur.obj"));

        assert_eq!(session.handle_line("m").unwrap(), Flow::Continue);
        assert_eq!(session.fur().settings().density, 4);

        session.handle_line("L").unwrap();
        assert!((session.fur().settings().length - 0.11).abs() < 1e-6);

        session.handle_line("b").unwrap();
        assert_eq!(session.fur().settings().orientation, Orientation::Shared);

        session.handle_line("nonsense").unwrap();
        session.handle_line("").unwrap();
        assert_eq!(session.handle_line("q").unwrap(), Flow::Quit);

        let scene = session.fur().sink();
        assert_eq!(scene.live_models(), 1);
        assert_eq!(scene.released_count(), 3);
    }

    #[test]
    fn test_run_writes_on_quit() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.obj");
        let mut session = session(output.clone());

        session.run(Cursor::new("w\nn\nq\nm\n")).unwrap();

        // m after q is never read
        assert_eq!(session.fur().settings().density, 2);
        assert_eq!(session.writes(), 2);

        let obj = std::fs::read_to_string(&output).unwrap();
        let hairs = session.fur().lines().segment_count();
        assert_eq!(obj.lines().filter(|l| l.starts_with("l ")).count(), hairs);
        assert!(dir.path().join("out.mtl").exists());
    }

    #[test]
    fn test_run_writes_on_eof() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("eof.obj");
        let mut session = session(output.clone());

        session.run(Cursor::new("k\n")).unwrap();
        assert_eq!(session.writes(), 1);
        assert!(output.exists());
    }
}
