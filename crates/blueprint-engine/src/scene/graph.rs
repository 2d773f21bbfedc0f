use glam::Mat4;

use super::{Layers, LineGeometry, LineMaterial, MeshGeometry, PhongMaterial, Transform};

/// Stable handle to a node in a [`Scene`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a node draws.
#[derive(Debug, Clone)]
pub enum NodeContent {
    /// Transform-only node.
    Group,
    Mesh {
        geometry: MeshGeometry,
        material: PhongMaterial,
    },
    Lines {
        geometry: LineGeometry,
        material: LineMaterial,
    },
}

impl NodeContent {
    #[inline]
    pub fn is_drawable(&self) -> bool {
        !matches!(self, NodeContent::Group)
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: Option<String>,
    pub transform: Transform,
    /// Tested per node against the camera; not inherited from the parent.
    pub layers: Layers,
    parent: Option<NodeId>,
    content: NodeContent,
}

impl Node {
    pub fn new(content: NodeContent) -> Self {
        Self {
            name: None,
            transform: Transform::IDENTITY,
            layers: Layers::default(),
            parent: None,
            content,
        }
    }

    pub fn group() -> Self {
        Self::new(NodeContent::Group)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn on_layer(mut self, layer: u8) -> Self {
        self.layers.set(layer);
        self
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn content(&self) -> &NodeContent {
        &self.content
    }
}

/// A drawable node resolved for one camera.
#[derive(Debug, Copy, Clone)]
pub struct VisibleNode<'a> {
    pub id: NodeId,
    pub world: Mat4,
    pub content: &'a NodeContent,
}

/// Flat node arena.
///
/// Parents are always inserted before their children, so a single forward
/// pass resolves every world matrix.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: Vec<Node>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `node` under `parent` (or at the root).
    ///
    /// # Panics
    /// If `parent` does not belong to this scene.
    pub fn add(&mut self, parent: Option<NodeId>, mut node: Node) -> NodeId {
        if let Some(p) = parent {
            assert!(p.index() < self.nodes.len(), "unknown parent {p:?}");
        }
        let id = NodeId(self.nodes.len() as u32);
        node.parent = parent;
        self.nodes.push(node);
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Number of nodes that issue draws.
    pub fn drawable_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.content.is_drawable()).count()
    }

    /// Local-to-world matrix of a single node.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.node(id)?;
        let mut world = node.transform.matrix();
        while let Some(parent) = node.parent {
            node = &self.nodes[parent.index()];
            world = node.transform.matrix() * world;
        }
        Some(world)
    }

    /// World matrices for every node, indexed by `NodeId::index`.
    pub fn world_matrices(&self) -> Vec<Mat4> {
        let mut out: Vec<Mat4> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let local = node.transform.matrix();
            let world = match node.parent {
                Some(p) => out[p.index()] * local,
                None => local,
            };
            out.push(world);
        }
        out
    }

    /// Drawable nodes whose layers intersect `camera_layers`, in insertion order.
    pub fn visible(&self, camera_layers: Layers) -> Vec<VisibleNode<'_>> {
        let worlds = self.world_matrices();
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.content.is_drawable() && camera_layers.test(n.layers))
            .map(|(i, n)| VisibleNode {
                id: NodeId(i as u32),
                world: worlds[i],
                content: &n.content,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn mesh() -> NodeContent {
        NodeContent::Mesh {
            geometry: MeshGeometry::cuboid(1.0, 1.0, 1.0),
            material: PhongMaterial::default(),
        }
    }

    #[test]
    fn world_matrix_composes_parent_chain() {
        let mut scene = Scene::new();
        let root = scene.add(None, Node::group().with_transform(Transform::from_position(Vec3::X * 10.0)));
        let child = scene.add(
            Some(root),
            Node::group().with_transform(Transform::from_position(Vec3::Y).with_scale(2.0)),
        );
        let leaf = scene.add(Some(child), Node::new(mesh()).with_transform(Transform::from_position(Vec3::Z)));

        let p = scene.world_matrix(leaf).unwrap().transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(10.0, 1.0, 2.0)).length() < 1e-5, "{p:?}");

        let batch = scene.world_matrices();
        assert!(batch[leaf.index()].abs_diff_eq(scene.world_matrix(leaf).unwrap(), 1e-6));
    }

    #[test]
    fn visibility_is_per_node_not_inherited() {
        let mut scene = Scene::new();
        let group = scene.add(None, Node::group().on_layer(5));
        let solid = scene.add(Some(group), Node::new(mesh()).on_layer(0));
        let wire = scene.add(
            Some(group),
            Node::new(NodeContent::Lines {
                geometry: LineGeometry::default(),
                material: LineMaterial::default(),
            })
            .on_layer(1),
        );

        let layer0: Vec<_> = scene.visible(Layers::only(0)).iter().map(|v| v.id).collect();
        let layer1: Vec<_> = scene.visible(Layers::only(1)).iter().map(|v| v.id).collect();
        assert_eq!(layer0, vec![solid]);
        assert_eq!(layer1, vec![wire]);
    }

    #[test]
    fn groups_are_never_drawn() {
        let mut scene = Scene::new();
        scene.add(None, Node::group());
        assert!(scene.visible(Layers::only(0)).is_empty());
        assert_eq!(scene.drawable_count(), 0);
    }

    #[test]
    fn unknown_node_yields_none() {
        let scene = Scene::new();
        assert!(scene.world_matrix(NodeId(3)).is_none());
    }

    #[test]
    #[should_panic(expected = "unknown parent")]
    fn adding_under_unknown_parent_panics() {
        let mut scene = Scene::new();
        scene.add(Some(NodeId(0)), Node::group());
    }
}
