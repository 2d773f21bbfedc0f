use anyhow::Result;
use glam::{Vec2, Vec3};

use blueprint_engine::anim::{ScrollDriver, TimeDriver};
use blueprint_engine::asset::{ModelLoad, ObjModel};
use blueprint_engine::compositor::{
    DrawSurface, FramingConfig, SceneContext, ViewSpec, ViewportCompositor,
};
use blueprint_engine::coords::SurfaceSize;
use blueprint_engine::input::InputFrame;
use blueprint_engine::paint::Color;
use blueprint_engine::scene::{
    AmbientLight, Lights, MeshGeometry, Node, NodeContent, PhongMaterial, PointLight, Scene,
    TrackedObject, TrackedObjectConfig,
};

use crate::choreography::{self, Prop, ShowcaseSink};
use crate::config::ShowcaseConfig;
use crate::overlay::{self, Element, OverlayLayers, OverlayState};
use crate::page::Page;

/// Full-surface solid view, then the wireframe view that starts collapsed.
pub const VIEWS: [ViewSpec; 2] = [ViewSpec::new(0.0, 1.0, 0), ViewSpec::new(0.0, 0.0, 1)];

/// Lifecycle of the showcase: waiting for the model, running, or given up.
#[derive(Debug)]
pub enum Stage {
    Loading(ModelLoad),
    Ready(Box<Showcase>),
    /// The model could not be loaded. Nothing is built or drawn.
    Failed,
}

impl Stage {
    pub fn load(config: &ShowcaseConfig) -> Self {
        Stage::Loading(ModelLoad::spawn(config.model_path.clone()))
    }

    /// Moves out of `Loading` once the load resolves. Returns whether the
    /// stage changed.
    pub fn poll(
        &mut self,
        config: &ShowcaseConfig,
        size: SurfaceSize,
        framing: FramingConfig,
        surface: &mut impl DrawSurface,
    ) -> bool {
        let Stage::Loading(load) = self else { return false };
        let Some(result) = load.try_take() else { return false };
        let path = load.path().display().to_string();

        let built = result
            .map_err(anyhow::Error::from)
            .and_then(|model| Showcase::build(model, config, size, framing, surface));

        *self = match built {
            Ok(showcase) => Stage::Ready(Box::new(showcase)),
            Err(err) => {
                log::error!("error loading model {path}: {err:#}");
                Stage::Failed
            }
        };
        true
    }

    pub fn showcase_mut(&mut self) -> Option<&mut Showcase> {
        match self {
            Stage::Ready(showcase) => Some(showcase),
            _ => None,
        }
    }
}

/// The running showcase: compositor, page and everything animating them.
#[derive(Debug)]
pub struct Showcase {
    compositor: ViewportCompositor,
    page: Page,
    overlay: OverlayState,
    scroll: ScrollDriver<Prop>,
    intro: TimeDriver<Prop>,
}

impl Showcase {
    /// Builds the scene around `model`, renders it once, poses it and starts
    /// the intro.
    pub fn build(
        model: ObjModel,
        config: &ShowcaseConfig,
        size: SurfaceSize,
        framing: FramingConfig,
        surface: &mut impl DrawSurface,
    ) -> Result<Self> {
        log::info!(
            "model ready: {} meshes, {} triangles",
            model.meshes.len(),
            model.triangle_count()
        );

        let context = scene_context(model.into_geometries(), config.debug_cube);
        let mut compositor = ViewportCompositor::initialize(&VIEWS, size, framing, context, surface);
        let page = Page::showcase();
        let mut overlay = OverlayState::default();

        let mut sink = ShowcaseSink {
            compositor: &mut compositor,
            overlay: &mut overlay,
        };
        let intro = choreography::intro(&mut sink);
        choreography::initial_pose(&mut sink);
        let scroll = choreography::scroll_driver(&page, &mut sink)?;
        compositor.render(surface);

        Ok(Self { compositor, page, overlay, scroll, intro })
    }

    /// Scrolls to `offset` (clamped) and scrubs the scroll animations.
    /// Returns whether anything was redrawn.
    pub fn scroll_to(&mut self, offset: f32, surface: &mut impl DrawSurface) -> bool {
        if !self.page.set_scroll(offset) {
            return false;
        }
        self.scrub(surface)
    }

    /// Applies this frame's wheel and keys. Returns whether anything was
    /// redrawn.
    pub fn apply_input(
        &mut self,
        frame: &InputFrame,
        viewport_px: f32,
        shift: bool,
        surface: &mut impl DrawSurface,
    ) -> bool {
        if !self.page.apply_input(frame, viewport_px, shift) {
            return false;
        }
        self.scrub(surface)
    }

    fn scrub(&mut self, surface: &mut impl DrawSurface) -> bool {
        let mut sink = ShowcaseSink {
            compositor: &mut self.compositor,
            overlay: &mut self.overlay,
        };
        self.scroll
            .update(self.page.scroll(), &mut sink, |s| s.compositor.render(surface))
    }

    /// Advances the intro by `dt` seconds.
    pub fn advance(&mut self, dt: f32, surface: &mut impl DrawSurface) -> bool {
        if !self.intro.is_active() {
            return false;
        }
        let mut sink = ShowcaseSink {
            compositor: &mut self.compositor,
            overlay: &mut self.overlay,
        };
        self.intro.advance(dt, &mut sink, |s| s.compositor.render(surface))
    }

    pub fn resize(&mut self, size: SurfaceSize, surface: &mut impl DrawSurface) {
        self.compositor.resize(size, surface);
    }

    /// Picks up a changed screen width or scale factor from `framing`.
    /// Returns whether the views were redrawn.
    pub fn reframe(&mut self, framing: &FramingConfig, surface: &mut impl DrawSurface) -> bool {
        self.compositor
            .reframe(framing.screen_width, framing.scale_factor, surface)
    }

    /// Whether wall-clock animations still need frames.
    pub fn is_animating(&self) -> bool {
        self.intro.is_active()
    }

    /// Canvas opacity and horizontal offset (fraction of the surface width).
    pub fn canvas_style(&self) -> (f32, f32) {
        let s = self.overlay.style(Element::Canvas);
        (s.opacity, s.x)
    }

    pub fn overlay_layers(&self, viewport: Vec2) -> OverlayLayers {
        overlay::layout(&self.overlay, &self.page, viewport)
    }

    pub fn compositor(&self) -> &ViewportCompositor {
        &self.compositor
    }

    pub fn page(&self) -> &Page {
        &self.page
    }
}

/// Scene for the showcase: the tracked object built from `meshes`, the
/// lighting rig and, optionally, a red debug cube at the origin.
pub fn scene_context(meshes: impl IntoIterator<Item = MeshGeometry>, debug_cube: bool) -> SceneContext {
    let mut scene = Scene::new();
    let config = TrackedObjectConfig {
        material: PhongMaterial {
            color: Color::from_hex(0x171511),
            specular: Color::from_hex(0xd0cbc7),
            shininess: 5.0,
        },
        ..TrackedObjectConfig::default()
    };
    let tracked = TrackedObject::build(&mut scene, meshes, &config);

    if debug_cube {
        let cube = Node::new(NodeContent::Mesh {
            geometry: MeshGeometry::cuboid(10.0, 10.0, 10.0),
            material: PhongMaterial {
                color: Color::from_hex(0xff0000),
                specular: Color::TRANSPARENT,
                shininess: 1.0,
            },
        });
        scene.add(None, cube.named("debug-cube").on_layer(0));
    }

    let lights = Lights {
        point: PointLight {
            color: Color::WHITE,
            intensity: 0.75,
            position: Vec3::new(70.0, -20.0, 150.0),
        },
        ambient: AmbientLight {
            color: Color::WHITE,
            intensity: 1.5,
        },
    };

    SceneContext { scene, tracked, lights }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use blueprint_engine::asset::{AssetError, ObjMesh};
    use blueprint_engine::compositor::RecordingSurface;

    use super::*;

    struct CaptureLogger(Mutex<Vec<(log::Level, String)>>);

    impl log::Log for CaptureLogger {
        fn enabled(&self, _: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            if let Ok(mut records) = self.0.lock() {
                records.push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger(Mutex::new(Vec::new()));

    fn errors_mentioning(needle: &str) -> usize {
        LOGGER
            .0
            .lock()
            .map(|r| {
                r.iter()
                    .filter(|(level, msg)| *level == log::Level::Error && msg.contains(needle))
                    .count()
            })
            .unwrap_or(0)
    }

    fn cube_model() -> ObjModel {
        ObjModel {
            meshes: vec![ObjMesh {
                name: Some("drone".into()),
                geometry: MeshGeometry::cuboid(2.0, 1.0, 4.0),
            }],
        }
    }

    fn size() -> SurfaceSize {
        SurfaceSize::new(1280, 720)
    }

    fn ready() -> (Showcase, RecordingSurface) {
        let mut surface = RecordingSurface::new();
        let mut stage = Stage::Loading(ModelLoad::ready("drone.obj", Ok(cube_model())));
        assert!(stage.poll(&ShowcaseConfig::default(), size(), FramingConfig::default(), &mut surface));
        match stage {
            Stage::Ready(showcase) => (*showcase, surface),
            other => panic!("expected a ready stage, got {other:?}"),
        }
    }

    fn fractions(showcase: &Showcase, index: usize) -> (f32, f32) {
        let v = &showcase.compositor().views()[index];
        (v.bottom, v.height)
    }

    #[test]
    fn load_failure_builds_and_renders_nothing() {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);

        let mut surface = RecordingSurface::new();
        let mut stage = Stage::Loading(ModelLoad::ready("missing-drone.obj", Err(AssetError::Empty)));

        assert!(stage.poll(&ShowcaseConfig::default(), size(), FramingConfig::default(), &mut surface));
        assert!(matches!(stage, Stage::Failed));
        assert!(stage.showcase_mut().is_none());
        assert_eq!(surface.renders, 0);
        assert!(surface.passes.is_empty());
        assert_eq!(errors_mentioning("missing-drone.obj"), 1);

        // Resolved once; later polls change nothing.
        assert!(!stage.poll(&ShowcaseConfig::default(), size(), FramingConfig::default(), &mut surface));
        assert_eq!(errors_mentioning("missing-drone.obj"), 1);
    }

    #[test]
    fn ready_stage_starts_with_the_solid_view_only() {
        let (showcase, surface) = ready();
        assert_eq!(fractions(&showcase, 0), (0.0, 1.0));
        assert_eq!(fractions(&showcase, 1), (0.0, 0.0));
        assert!(surface.renders >= 2);

        let last = surface.last_render();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].index, 0);
    }

    #[test]
    fn initial_pose_is_applied() {
        let (showcase, _) = ready();
        let ctx = showcase.compositor().context();
        let t = ctx.tracked.transform(&ctx.scene).copied().unwrap();
        assert_eq!(t.position, Vec3::new(80.0, -32.0, -60.0));
        assert_eq!(t.rotation.y, -std::f32::consts::TAU * 0.25);
    }

    #[test]
    fn scrolling_to_the_end_collapses_the_wireframe_view_at_the_top() {
        let (mut showcase, mut surface) = ready();
        let before = surface.renders;

        assert!(showcase.scroll_to(5.0, &mut surface));
        assert_eq!(fractions(&showcase, 1), (1.0, 0.0));
        assert_eq!(fractions(&showcase, 0), (0.0, 1.0));
        assert_eq!(surface.renders, before + 1);

        // Clamped: nothing moves past the end.
        assert!(!showcase.scroll_to(7.0, &mut surface));
        assert_eq!(surface.renders, before + 1);
    }

    #[test]
    fn views_keep_their_layers_apart() {
        let (mut showcase, mut surface) = ready();
        showcase.scroll_to(4.0, &mut surface);
        assert_eq!(fractions(&showcase, 1), (0.0, 1.0));

        let ctx = showcase.compositor().context();
        let wireframe = ctx.tracked.wireframe().unwrap();
        let meshes = ctx.tracked.meshes().to_vec();

        let last = surface.last_render();
        assert_eq!(last.len(), 2);
        assert_eq!(last[0].drawn, meshes);
        assert_eq!(last[1].drawn, vec![wireframe]);
    }

    #[test]
    fn resize_reframes_every_camera() {
        let (mut showcase, mut surface) = ready();
        showcase.resize(SurfaceSize::new(800, 600), &mut surface);
        for view in showcase.compositor().views() {
            assert_eq!(view.camera.aspect, 800.0 / 600.0);
        }
        let last = surface.last_render();
        assert_eq!(last[0].scissor.height, 600);
    }

    #[test]
    fn reframing_on_a_hidpi_display_uses_logical_widths() {
        let (mut showcase, mut surface) = ready();
        // 1280 px at scale 2 is a 640 pt window on a 1440 pt screen.
        let framing = FramingConfig {
            screen_width: 1440.0,
            scale_factor: 2.0,
            ..FramingConfig::default()
        };
        assert!(showcase.reframe(&framing, &mut surface));
        let z = (1440.0 - 640.0) / 3.0;
        for view in showcase.compositor().views() {
            assert_eq!(view.camera.position.z, z);
        }
        assert!(!showcase.reframe(&framing, &mut surface));
    }

    #[test]
    fn intro_brings_the_canvas_in() {
        let (mut showcase, mut surface) = ready();
        assert_eq!(showcase.canvas_style(), (0.0, 0.5));
        assert!(showcase.is_animating());

        let before = surface.renders;
        assert!(showcase.advance(1.0, &mut surface));
        assert_eq!(showcase.canvas_style(), (1.0, 0.0));
        assert!(!showcase.is_animating());
        assert_eq!(surface.renders, before + 1);

        assert!(!showcase.advance(1.0, &mut surface));
    }

    #[test]
    fn input_scrolls_the_page() {
        let (mut showcase, mut surface) = ready();
        let mut frame = InputFrame::default();
        frame.wheel_pixels = -360.0;
        assert!(showcase.apply_input(&frame, 720.0, false, &mut surface));
        assert_eq!(showcase.page().scroll(), 0.5);
    }

    #[test]
    fn debug_cube_sits_on_the_solid_layer() {
        let without = scene_context([MeshGeometry::cuboid(1.0, 1.0, 1.0)], false);
        let with = scene_context([MeshGeometry::cuboid(1.0, 1.0, 1.0)], true);
        assert_eq!(with.scene.drawable_count(), without.scene.drawable_count() + 1);

        let cube = with
            .scene
            .iter()
            .find(|(_, n)| n.name.as_deref() == Some("debug-cube"))
            .map(|(_, n)| n.layers);
        assert_eq!(cube, Some(blueprint_engine::scene::Layers::only(0)));
    }
}
