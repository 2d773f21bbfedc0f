use crate::scene::{Lights, Scene, TrackedObject};

/// Everything a view pass draws: the scene graph, the animated object in it
/// and the lighting rig.
#[derive(Debug, Clone)]
pub struct SceneContext {
    pub scene: Scene,
    pub tracked: TrackedObject,
    pub lights: Lights,
}
