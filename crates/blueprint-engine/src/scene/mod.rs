//! Scene graph.
//!
//! Responsibilities:
//! - a flat arena of nodes with parent links and local transforms
//! - per-node visibility layers tested against camera layers
//! - the perspective camera used by compositor views
//! - geometry helpers (meshes, derived edge lines) and light parameters
//!
//! Geometry is immutable once inserted; only transforms and layers change
//! after setup.

mod camera;
mod edges;
mod geometry;
mod graph;
mod layers;
mod light;
mod material;
mod tracked;
mod transform;

pub use camera::PerspectiveCamera;
pub use edges::edges_geometry;
pub use geometry::{LineGeometry, MeshGeometry};
pub use graph::{Node, NodeContent, NodeId, Scene, VisibleNode};
pub use layers::Layers;
pub use light::{AmbientLight, Lights, PointLight};
pub use material::{LineMaterial, PhongMaterial};
pub use tracked::{TrackedObject, TrackedObjectConfig};
pub use transform::{Axis, Transform};
