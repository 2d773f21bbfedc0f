use glam::Vec3;

use super::{
    edges_geometry, LineMaterial, MeshGeometry, Node, NodeContent, NodeId, PhongMaterial, Scene,
    Transform,
};

/// How a loaded model is split between the solid and wireframe layers.
#[derive(Debug, Clone)]
pub struct TrackedObjectConfig {
    /// Uniform scale of the model and its wireframe.
    pub model_scale: f32,
    pub solid_layer: u8,
    pub wireframe_layer: u8,
    /// Wireframe translation relative to the root group.
    pub wireframe_offset: Vec3,
    /// Dihedral angle above which a shared edge counts as a feature edge.
    pub edge_threshold_degrees: f32,
    pub material: PhongMaterial,
    pub line_material: LineMaterial,
}

impl Default for TrackedObjectConfig {
    fn default() -> Self {
        Self {
            model_scale: 10.0,
            solid_layer: 0,
            wireframe_layer: 1,
            wireframe_offset: Vec3::new(0.5, 0.2, -1.0),
            edge_threshold_degrees: 1.0,
            material: PhongMaterial::default(),
            line_material: LineMaterial {
                opacity: 0.5,
                depth_test: false,
                ..LineMaterial::default()
            },
        }
    }
}

/// The animated object: one root group holding the solid model and its
/// wireframe so both move together.
///
/// ```text
/// root (animated)
/// ├── model (scaled, solid layer)
/// │   └── mesh × N (solid layer)
/// └── wireframe (scaled, offset, wireframe layer)
/// ```
#[derive(Debug, Clone)]
pub struct TrackedObject {
    root: NodeId,
    model: NodeId,
    meshes: Vec<NodeId>,
    wireframe: Option<NodeId>,
}

impl TrackedObject {
    /// Inserts the object into `scene`.
    ///
    /// Wireframe edges are derived from the first non-empty mesh only.
    pub fn build(
        scene: &mut Scene,
        meshes: impl IntoIterator<Item = MeshGeometry>,
        config: &TrackedObjectConfig,
    ) -> Self {
        let root = scene.add(None, Node::group().named("tracked"));
        let model = scene.add(
            Some(root),
            Node::group()
                .named("model")
                .with_transform(Transform::IDENTITY.with_scale(config.model_scale))
                .on_layer(config.solid_layer),
        );

        let mut edges = None;
        let mut mesh_ids = Vec::new();
        for geometry in meshes {
            if geometry.is_empty() {
                continue;
            }
            if edges.is_none() {
                edges = Some(edges_geometry(&geometry, config.edge_threshold_degrees));
            }
            let id = scene.add(
                Some(model),
                Node::new(NodeContent::Mesh {
                    geometry,
                    material: config.material,
                })
                .on_layer(config.solid_layer),
            );
            mesh_ids.push(id);
        }

        let wireframe = edges.map(|geometry| {
            log::debug!("wireframe has {} edges", geometry.segment_count());
            let transform = Transform::from_position(config.wireframe_offset)
                .with_scale(config.model_scale);
            scene.add(
                Some(root),
                Node::new(NodeContent::Lines {
                    geometry,
                    material: config.line_material,
                })
                .named("wireframe")
                .with_transform(transform)
                .on_layer(config.wireframe_layer),
            )
        });

        Self {
            root,
            model,
            meshes: mesh_ids,
            wireframe,
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn model(&self) -> NodeId {
        self.model
    }

    #[inline]
    pub fn meshes(&self) -> &[NodeId] {
        &self.meshes
    }

    #[inline]
    pub fn wireframe(&self) -> Option<NodeId> {
        self.wireframe
    }

    /// Current root transform.
    pub fn transform<'s>(&self, scene: &'s Scene) -> Option<&'s Transform> {
        scene.node(self.root).map(|n| &n.transform)
    }

    /// Mutable root transform; position and rotation are what animations drive.
    pub fn transform_mut<'s>(&self, scene: &'s mut Scene) -> Option<&'s mut Transform> {
        scene.node_mut(self.root).map(|n| &mut n.transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Layers;

    fn build() -> (Scene, TrackedObject) {
        let mut scene = Scene::new();
        let obj = TrackedObject::build(
            &mut scene,
            [MeshGeometry::cuboid(1.0, 1.0, 1.0), MeshGeometry::cuboid(2.0, 2.0, 2.0)],
            &TrackedObjectConfig::default(),
        );
        (scene, obj)
    }

    #[test]
    fn solid_and_wireframe_land_on_separate_layers() {
        let (scene, obj) = build();
        let solid: Vec<_> = scene.visible(Layers::only(0)).iter().map(|v| v.id).collect();
        let wire: Vec<_> = scene.visible(Layers::only(1)).iter().map(|v| v.id).collect();
        assert_eq!(solid, obj.meshes());
        assert_eq!(wire, vec![obj.wireframe().unwrap()]);
    }

    #[test]
    fn wireframe_comes_from_first_mesh() {
        let (scene, obj) = build();
        match scene.node(obj.wireframe().unwrap()).unwrap().content() {
            NodeContent::Lines { geometry, material } => {
                assert_eq!(geometry.segment_count(), 12);
                assert_eq!(material.opacity, 0.5);
                assert!(!material.depth_test);
            }
            other => panic!("unexpected content {other:?}"),
        }
    }

    #[test]
    fn root_transform_moves_both_layers() {
        let (mut scene, obj) = build();
        obj.transform_mut(&mut scene).unwrap().position = Vec3::new(80.0, -32.0, -60.0);

        let mesh_origin = scene.world_matrix(obj.meshes()[0]).unwrap().transform_point3(Vec3::ZERO);
        let wire_origin = scene
            .world_matrix(obj.wireframe().unwrap())
            .unwrap()
            .transform_point3(Vec3::ZERO);
        assert!((mesh_origin - Vec3::new(80.0, -32.0, -60.0)).length() < 1e-4);
        assert!((wire_origin - Vec3::new(80.5, -31.8, -61.0)).length() < 1e-4);
    }

    #[test]
    fn empty_meshes_are_skipped() {
        let mut scene = Scene::new();
        let obj = TrackedObject::build(&mut scene, [MeshGeometry::default()], &TrackedObjectConfig::default());
        assert!(obj.meshes().is_empty());
        assert!(obj.wireframe().is_none());
    }
}
