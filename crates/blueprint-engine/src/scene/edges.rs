use std::collections::HashMap;
use std::collections::hash_map::Entry;

use glam::Vec3;

use super::{LineGeometry, MeshGeometry};

/// Position quantization used to weld vertices before edge matching.
const WELD_PRECISION: f32 = 1e4;

type VertexKey = [i64; 3];

struct OpenEdge {
    a: Vec3,
    b: Vec3,
    normal: Vec3,
}

/// Derives the feature edges of a mesh.
///
/// An edge is kept when it borders a single triangle (open boundary) or when
/// the normals of its two triangles differ by more than `threshold_degrees`.
/// Coplanar diagonals of a quad are dropped, so a box yields its 12 outline
/// edges. Vertices are welded by position, so split-vertex meshes behave the
/// same as shared-vertex ones.
pub fn edges_geometry(mesh: &MeshGeometry, threshold_degrees: f32) -> LineGeometry {
    let threshold_dot = threshold_degrees.to_radians().cos();

    // `None` marks an edge already matched with its twin.
    let mut open: HashMap<(VertexKey, VertexKey), Option<OpenEdge>> = HashMap::new();
    let mut order: Vec<(VertexKey, VertexKey)> = Vec::new();
    let mut segments: Vec<[Vec3; 2]> = Vec::new();

    for tri in mesh.triangles() {
        let keys = tri.map(weld_key);
        if keys[0] == keys[1] || keys[1] == keys[2] || keys[2] == keys[0] {
            continue;
        }
        let normal = (tri[2] - tri[1]).cross(tri[0] - tri[1]).normalize_or_zero();

        for j in 0..3 {
            let next = (j + 1) % 3;
            let forward = (keys[j], keys[next]);
            let reverse = (keys[next], keys[j]);

            if let Some(slot) = open.get_mut(&reverse) {
                if let Some(twin) = slot.take() {
                    if normal.dot(twin.normal) <= threshold_dot {
                        segments.push([twin.a, twin.b]);
                    }
                    continue;
                }
            }

            if let Entry::Vacant(v) = open.entry(forward) {
                v.insert(Some(OpenEdge { a: tri[j], b: tri[next], normal }));
                order.push(forward);
            }
        }
    }

    // Unmatched edges are boundaries.
    for key in order {
        if let Some(Some(edge)) = open.remove(&key) {
            segments.push([edge.a, edge.b]);
        }
    }

    LineGeometry::from_segments(segments)
}

fn weld_key(p: Vec3) -> VertexKey {
    [
        (p.x * WELD_PRECISION).round() as i64,
        (p.y * WELD_PRECISION).round() as i64,
        (p.z * WELD_PRECISION).round() as i64,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_outline_has_twelve_edges() {
        let edges = edges_geometry(&MeshGeometry::cuboid(10.0, 10.0, 10.0), 1.0);
        assert_eq!(edges.segment_count(), 12);
    }

    #[test]
    fn single_triangle_is_all_boundary() {
        let tri = MeshGeometry::new(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], vec![0, 1, 2]);
        assert_eq!(edges_geometry(&tri, 1.0).segment_count(), 3);
    }

    #[test]
    fn flat_quad_drops_the_diagonal() {
        let quad = MeshGeometry::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            vec![0, 1, 2, 0, 2, 3],
        );
        assert_eq!(edges_geometry(&quad, 1.0).segment_count(), 4);
    }

    #[test]
    fn split_vertices_are_welded() {
        // Same quad, but the second triangle carries its own copies of the shared corners.
        let quad = MeshGeometry::new(
            vec![
                [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0],
                [0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0],
            ],
            vec![0, 1, 2, 3, 4, 5],
        );
        assert_eq!(edges_geometry(&quad, 1.0).segment_count(), 4);
    }

    #[test]
    fn shallow_fold_respects_threshold() {
        // Two triangles folded by ~5.7 degrees along the shared edge x = 0..1, y = 0.
        let folded = MeshGeometry::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0], [0.5, -1.0, 0.1]],
            vec![0, 1, 2, 1, 0, 3],
        );
        assert_eq!(edges_geometry(&folded, 1.0).segment_count(), 5);
        assert_eq!(edges_geometry(&folded, 10.0).segment_count(), 4);
    }

    #[test]
    fn degenerate_triangles_are_skipped() {
        let sliver = MeshGeometry::new(vec![[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]], vec![0, 1, 2]);
        assert!(edges_geometry(&sliver, 1.0).is_empty());
    }
}
