//! Wavefront OBJ import and fur line export

use anyhow::{Context, Result};
use furview_core::{BaseMesh, Faces, FurError, LineModel};
use glam::Vec3;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading an OBJ mesh.
#[derive(Debug, Error)]
pub enum ObjError {
    /// A line could not be parsed
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// The faces do not form a triangle-only or quad-only mesh
    #[error("line {line}: {source}")]
    Topology {
        /// 1-based line number of the offending face
        line: usize,
        /// Underlying topology error
        source: FurError,
    },

    /// The file contains no vertices
    #[error("no vertices found in OBJ file")]
    Empty,

    /// Reading failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Corner reference parsed from a face token, already 0-based.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Corner {
    vertex: usize,
    normal: Option<usize>,
}

/// Load an OBJ file as a single fur base mesh.
pub fn load_obj(path: &Path) -> Result<BaseMesh> {
    let file = File::open(path).with_context(|| format!("Failed to open OBJ: {:?}", path))?;
    let mesh = parse_obj(BufReader::new(file))
        .with_context(|| format!("Failed to parse OBJ: {:?}", path))?;

    tracing::info!(
        "Loaded {:?}: {} vertices, {} faces",
        path,
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// Parse OBJ text into a base mesh.
///
/// Every face must be a triangle or every face a quad. Normals are taken from
/// `vn` records when each vertex maps to exactly one normal; otherwise they are
/// computed from the faces.
pub fn parse_obj<R: BufRead>(reader: R) -> Result<BaseMesh, ObjError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut normals_raw: Vec<Vec3> = Vec::new();
    let mut polygons: Vec<Vec<u32>> = Vec::new();
    let mut face_lines: Vec<usize> = Vec::new();

    // Normal index chosen for each vertex, and whether that choice held up
    let mut vertex_normals: Vec<Option<usize>> = Vec::new();
    let mut normals_usable = true;

    for (line_index, line) in reader.lines().enumerate() {
        let line_nb = line_index + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" => {
                positions.push(parse_vec3(&parts, line_nb)?);
                vertex_normals.push(None);
            }
            "vn" => normals_raw.push(parse_vec3(&parts, line_nb)?),
            "vt" | "vp" | "o" | "g" | "s" | "mtllib" | "usemtl" => {
                tracing::debug!("[l.{}] Ignoring '{}' record", line_nb, parts[0]);
            }
            "f" => {
                let mut polygon = Vec::with_capacity(parts.len() - 1);
                for token in &parts[1..] {
                    let corner =
                        parse_obj_vertex(token, positions.len(), normals_raw.len()).ok_or_else(
                            || ObjError::Parse {
                                line: line_nb,
                                message: format!("invalid face corner '{}'", token),
                            },
                        )?;

                    match (corner.normal, vertex_normals[corner.vertex]) {
                        (None, _) => normals_usable = false,
                        (Some(n), None) => vertex_normals[corner.vertex] = Some(n),
                        (Some(n), Some(existing)) if n != existing => normals_usable = false,
                        _ => {}
                    }

                    polygon.push(corner.vertex as u32);
                }
                polygons.push(polygon);
                face_lines.push(line_nb);
            }
            other => {
                tracing::warn!("[l.{}] Unknown OBJ record '{}', skipping", line_nb, other);
            }
        }
    }

    if positions.is_empty() {
        return Err(ObjError::Empty);
    }

    let faces = Faces::from_polygons(&polygons).map_err(|source| {
        let line = match source {
            FurError::UnsupportedArity { face, .. } | FurError::MixedArity { face, .. } => {
                face_lines[face]
            }
            _ => 0,
        };
        ObjError::Topology { line, source }
    })?;

    // Vertices not referenced by any face never get a normal from `vn`
    let normals = if normals_usable && !polygons.is_empty() {
        vertex_normals
            .iter()
            .map(|n| n.map(|i| normals_raw[i]))
            .collect::<Option<Vec<Vec3>>>()
    } else {
        None
    };

    tracing::debug!(
        "Parsed OBJ: {} vertices, {} normals, {} faces, normals {}",
        positions.len(),
        normals_raw.len(),
        polygons.len(),
        if normals.is_some() { "from file" } else { "computed" }
    );

    // Indices were range-checked while parsing corners
    BaseMesh::new(positions, normals, faces).map_err(|source| ObjError::Topology { line: 0, source })
}

fn parse_vec3(parts: &[&str], line: usize) -> Result<Vec3, ObjError> {
    if parts.len() < 4 {
        return Err(ObjError::Parse {
            line,
            message: format!("3 entries expected for '{}'", parts[0]),
        });
    }

    let mut xyz = [0.0f32; 3];
    for (value, token) in xyz.iter_mut().zip(&parts[1..4]) {
        *value = token.parse().map_err(|_| ObjError::Parse {
            line,
            message: format!("invalid number '{}'", token),
        })?;
    }
    Ok(Vec3::from(xyz))
}

/// Parse OBJ vertex reference: "v", "v/vt", "v/vt/vn", or "v//vn"
///
/// Negative indices count back from the most recent record.
fn parse_obj_vertex(s: &str, vertex_count: usize, normal_count: usize) -> Option<Corner> {
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() > 3 {
        return None;
    }

    let vertex = resolve_index(parts.first()?, vertex_count)?;

    let normal = match parts.get(2).filter(|s| !s.is_empty()) {
        Some(s) => Some(resolve_index(s, normal_count)?),
        None => None,
    };

    Some(Corner { vertex, normal })
}

fn resolve_index(s: &str, count: usize) -> Option<usize> {
    let raw: i64 = s.parse().ok()?;
    let index = if raw > 0 {
        raw as usize - 1 // OBJ indices are 1-based
    } else if raw < 0 {
        count.checked_sub(raw.unsigned_abs() as usize)?
    } else {
        return None;
    };
    (index < count).then_some(index)
}

/// Write a fur line model as OBJ `l` elements plus a sibling `.mtl` file.
pub fn write_lines_obj(model: &LineModel, path: &Path, name: &str) -> std::io::Result<()> {
    let mtl_path = path.with_extension("mtl");
    let mtl_name = mtl_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{name}.mtl"));

    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "# Furview fur export")?;
    writeln!(w, "# {} hairs", model.buffer.segment_count())?;
    writeln!(w, "mtllib {}", mtl_name)?;
    writeln!(w, "o {}", name)?;

    for p in &model.buffer.positions {
        writeln!(w, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for n in &model.buffer.normals {
        writeln!(w, "vn {} {} {}", n.x, n.y, n.z)?;
    }

    writeln!(w, "usemtl fur")?;
    for i in 0..model.buffer.segment_count() {
        writeln!(w, "l {} {}", 2 * i + 1, 2 * i + 2)?;
    }
    w.flush()?;

    let material = &model.material;
    let mut m = BufWriter::new(File::create(&mtl_path)?);
    writeln!(m, "newmtl fur")?;
    writeln!(m, "Ka {} {} {}", material.ambient[0], material.ambient[1], material.ambient[2])?;
    writeln!(m, "Kd {} {} {}", material.diffuse[0], material.diffuse[1], material.diffuse[2])?;
    writeln!(m, "Ks {} {} {}", material.specular[0], material.specular[1], material.specular[2])?;
    writeln!(m, "Ns {}", material.shininess)?;
    m.flush()?;

    tracing::info!(
        "Wrote {} hairs to {:?}",
        model.buffer.segment_count(),
        path
    );
    Ok(())
}
