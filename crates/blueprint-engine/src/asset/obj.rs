use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::scene::MeshGeometry;

use super::AssetError;

/// One `o`/`g` section of an OBJ file.
#[derive(Debug, Clone)]
pub struct ObjMesh {
    pub name: Option<String>,
    pub geometry: MeshGeometry,
}

#[derive(Debug, Clone, Default)]
pub struct ObjModel {
    pub meshes: Vec<ObjMesh>,
}

impl ObjModel {
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.geometry.triangle_count()).sum()
    }

    /// Geometry of every mesh, in file order.
    pub fn into_geometries(self) -> impl Iterator<Item = MeshGeometry> {
        self.meshes.into_iter().map(|m| m.geometry)
    }
}

/// Reads an OBJ file from disk.
pub fn read_obj(path: impl AsRef<Path>) -> Result<ObjModel, AssetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_obj(BufReader::new(file)).map_err(|err| match err {
        AssetError::Io { source, .. } => AssetError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Parses OBJ text.
///
/// Supports `v` and `f` (polygons are fan-triangulated, negative indices are
/// relative to the vertices read so far). `o` and `g` start a new mesh.
/// Texture coordinates, normals and materials are ignored.
pub fn parse_obj(reader: impl BufRead) -> Result<ObjModel, AssetError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut builder = MeshBuilder::default();
    let mut meshes = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|source| AssetError::Io {
            path: Default::default(),
            source,
        })?;
        let s = line.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        let mut it = s.split_whitespace();
        let tag = it.next().unwrap_or("");
        match tag {
            "v" => {
                let mut p = [0.0f32; 3];
                for c in &mut p {
                    let tok = it
                        .next()
                        .ok_or_else(|| AssetError::parse(line_no, "vertex needs three coordinates"))?;
                    *c = tok
                        .parse()
                        .map_err(|_| AssetError::parse(line_no, format!("invalid coordinate `{tok}`")))?;
                }
                positions.push(p);
            }
            "f" => {
                let corners = it
                    .map(|tok| resolve_index(tok, positions.len(), line_no))
                    .collect::<Result<Vec<_>, _>>()?;
                if corners.len() < 3 {
                    return Err(AssetError::parse(line_no, "face needs at least three vertices"));
                }
                for k in 1..corners.len() - 1 {
                    builder.triangle([corners[0], corners[k], corners[k + 1]], &positions);
                }
            }
            "o" | "g" => {
                if let Some(mesh) = builder.finish() {
                    meshes.push(mesh);
                }
                let name = it.collect::<Vec<_>>().join(" ");
                builder.name = (!name.is_empty()).then_some(name);
            }
            _ => {}
        }
    }

    if let Some(mesh) = builder.finish() {
        meshes.push(mesh);
    }
    if meshes.is_empty() {
        return Err(AssetError::Empty);
    }
    Ok(ObjModel { meshes })
}

/// `f` token (`v`, `v/vt`, `v//vn`, `v/vt/vn`) to a zero-based position index.
fn resolve_index(tok: &str, len: usize, line_no: usize) -> Result<usize, AssetError> {
    let raw = tok.split('/').next().unwrap_or("");
    let idx: i64 = raw
        .parse()
        .map_err(|_| AssetError::parse(line_no, format!("invalid face index `{tok}`")))?;
    let resolved = match idx {
        0 => None,
        i if i > 0 => Some(i - 1),
        i => Some(len as i64 + i),
    };
    match resolved {
        Some(r) if r >= 0 && (r as usize) < len => Ok(r as usize),
        _ => Err(AssetError::parse(line_no, format!("face index `{tok}` out of range"))),
    }
}

/// Collects one mesh with its own compact vertex list.
#[derive(Default)]
struct MeshBuilder {
    name: Option<String>,
    remap: HashMap<usize, u32>,
    positions: Vec<[f32; 3]>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    fn triangle(&mut self, corners: [usize; 3], source: &[[f32; 3]]) {
        for global in corners {
            let local = *self.remap.entry(global).or_insert_with(|| {
                self.positions.push(source[global]);
                (self.positions.len() - 1) as u32
            });
            self.indices.push(local);
        }
    }

    fn finish(&mut self) -> Option<ObjMesh> {
        self.remap.clear();
        let positions = std::mem::take(&mut self.positions);
        let indices = std::mem::take(&mut self.indices);
        let name = self.name.take();
        if indices.is_empty() {
            return None;
        }
        Some(ObjMesh {
            name,
            geometry: MeshGeometry::new(positions, indices),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Result<ObjModel, AssetError> {
        parse_obj(src.as_bytes())
    }

    #[test]
    fn quad_is_fan_triangulated() {
        let model = parse(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        )
        .unwrap();
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.meshes[0].geometry.indices(), &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn negative_and_slashed_indices() {
        let model = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf -3//1 -2//1 -1//1\n").unwrap();
        assert_eq!(model.triangle_count(), 1);
        assert_eq!(model.meshes[0].geometry.positions()[2], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn objects_split_into_meshes_with_local_vertices() {
        let src = "\
o Body
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o Rotor
v 5 5 5
v 6 5 5
v 5 6 5
f 4 5 6
";
        let model = parse(src).unwrap();
        assert_eq!(model.meshes.len(), 2);
        assert_eq!(model.meshes[0].name.as_deref(), Some("Body"));
        assert_eq!(model.meshes[1].name.as_deref(), Some("Rotor"));
        assert_eq!(model.meshes[1].geometry.indices(), &[0, 1, 2]);
        assert_eq!(model.meshes[1].geometry.positions()[0], [5.0, 5.0, 5.0]);
    }

    #[test]
    fn groups_without_faces_are_dropped() {
        let model = parse("g empty\nv 0 0 0\nv 1 0 0\nv 0 1 0\ng tri\nf 1 2 3\n").unwrap();
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.meshes[0].name.as_deref(), Some("tri"));
    }

    #[test]
    fn no_faces_is_empty() {
        assert!(matches!(parse("v 0 0 0\n# nothing else\n"), Err(AssetError::Empty)));
    }

    #[test]
    fn out_of_range_index_reports_line() {
        match parse("v 0 0 0\nv 1 0 0\nf 1 2 3\n") {
            Err(AssetError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn malformed_vertex_is_a_parse_error() {
        assert!(matches!(parse("v 0 zero 0\n"), Err(AssetError::Parse { line: 1, .. })));
    }

    #[test]
    fn missing_file_is_io_error_with_path() {
        match read_obj("definitely/not/here.obj") {
            Err(AssetError::Io { path, .. }) => assert!(path.ends_with("here.obj")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
