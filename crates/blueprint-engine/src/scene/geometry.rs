use glam::Vec3;

/// Indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGeometry {
    positions: Vec<[f32; 3]>,
    indices: Vec<u32>,
}

impl MeshGeometry {
    /// `indices` is a triangle list; every index must address `positions`.
    pub fn new(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        debug_assert!(indices.len() % 3 == 0, "triangle list length must be a multiple of 3");
        debug_assert!(
            indices.iter().all(|&i| (i as usize) < positions.len()),
            "index out of range"
        );
        Self { positions, indices }
    }

    /// Axis-aligned box centered on the origin, one quad per face.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);
        let corners = [
            [-x, -y, -z], [x, -y, -z], [x, y, -z], [-x, y, -z],
            [-x, -y, z],  [x, -y, z],  [x, y, z],  [-x, y, z],
        ];
        // CCW seen from outside.
        let faces: [[u32; 4]; 6] = [
            [4, 5, 6, 7], // +z
            [1, 0, 3, 2], // -z
            [5, 1, 2, 6], // +x
            [0, 4, 7, 3], // -x
            [7, 6, 2, 3], // +y
            [0, 1, 5, 4], // -y
        ];
        let mut indices = Vec::with_capacity(36);
        for [a, b, c, d] in faces {
            indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
        Self::new(corners.to_vec(), indices)
    }

    #[inline]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Triangles as corner positions.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| {
            [
                Vec3::from_array(self.positions[t[0] as usize]),
                Vec3::from_array(self.positions[t[1] as usize]),
                Vec3::from_array(self.positions[t[2] as usize]),
            ]
        })
    }

    /// Axis-aligned bounds `(min, max)`, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut it = self.positions.iter().map(|p| Vec3::from_array(*p));
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

/// Unindexed line list: consecutive position pairs form one segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineGeometry {
    positions: Vec<[f32; 3]>,
}

impl LineGeometry {
    pub fn from_segments(segments: impl IntoIterator<Item = [Vec3; 2]>) -> Self {
        let mut positions = Vec::new();
        for [a, b] in segments {
            positions.push(a.to_array());
            positions.push(b.to_array());
        }
        Self { positions }
    }

    #[inline]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.positions.len() / 2
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
