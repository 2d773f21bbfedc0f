use crate::coords::{PixelRect, SurfaceSize};

use super::{DrawSurface, FramingConfig, SceneContext, View, ViewPass, ViewSpec};

/// Renders a list of views into slices of one surface.
///
/// Owns the scene context; nothing about the scene is global. `resize` and
/// `render` are idempotent and cheap to call repeatedly.
#[derive(Debug, Clone)]
pub struct ViewportCompositor {
    views: Vec<View>,
    context: SceneContext,
    framing: FramingConfig,
    size: SurfaceSize,
}

impl ViewportCompositor {
    /// Creates one camera per view, each seeing only its view's layer, frames
    /// them for `size` and renders once.
    pub fn initialize(
        specs: &[ViewSpec],
        size: SurfaceSize,
        framing: FramingConfig,
        context: SceneContext,
        surface: &mut impl DrawSurface,
    ) -> Self {
        let aspect = if size.is_valid() { size.aspect() } else { 1.0 };
        let views = specs
            .iter()
            .map(|spec| View {
                bottom: spec.bottom,
                height: spec.height,
                camera: framing.camera(aspect, spec.layer),
            })
            .collect();

        let mut compositor = Self {
            views,
            context,
            framing,
            size: SurfaceSize::new(0, 0),
        };
        log::debug!("compositor initialized with {} views", compositor.views.len());
        compositor.resize(size, surface);
        compositor
    }

    /// Adopts a new surface size: every camera gets aspect `width / height`
    /// and is pulled back to the framing distance, then the views are
    /// redrawn. A zero-area size is ignored.
    pub fn resize(&mut self, size: SurfaceSize, surface: &mut impl DrawSurface) {
        if !size.is_valid() {
            log::debug!("ignoring zero-area resize {}x{}", size.width, size.height);
            return;
        }
        self.size = size;
        let aspect = size.aspect();
        let z = self.framing.camera_distance(size.width);
        for view in &mut self.views {
            view.camera.aspect = aspect;
            view.camera.position.z = z;
        }
        self.render(surface);
    }

    /// Draws every view whose slice is on the surface, in view order.
    pub fn render(&mut self, surface: &mut impl DrawSurface) {
        let size = self.size;
        if !size.is_valid() {
            return;
        }

        surface.begin(&self.context, self.views.len());
        let viewport = PixelRect::full(size);
        for (index, view) in self.views.iter_mut().enumerate() {
            view.camera.aspect = size.aspect();
            let scissor = view.rect(size).clamped_to(size);
            if scissor.is_empty() {
                continue;
            }
            let pass = ViewPass {
                index,
                viewport,
                scissor,
                camera: &view.camera,
                surface: size,
            };
            surface.draw_view(&pass, &self.context);
        }
        surface.finish();
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn framing(&self) -> &FramingConfig {
        &self.framing
    }

    /// Adopts a new screen width (logical pixels) and surface scale factor,
    /// then re-runs [`resize`](Self::resize) so cameras are reframed.
    ///
    /// Returns `false` without redrawing when neither changed.
    pub fn reframe(&mut self, screen_width: f32, scale_factor: f32, surface: &mut impl DrawSurface) -> bool {
        if self.framing.screen_width == screen_width && self.framing.scale_factor == scale_factor {
            return false;
        }
        log::debug!("reframing for a {screen_width} pt screen at scale {scale_factor}");
        self.framing.screen_width = screen_width;
        self.framing.scale_factor = scale_factor;
        self.resize(self.size, surface);
        true
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    pub fn view_mut(&mut self, index: usize) -> Option<&mut View> {
        self.views.get_mut(index)
    }

    /// Current slice of every view, unclamped.
    pub fn view_rects(&self) -> Vec<PixelRect> {
        self.views.iter().map(|v| v.rect(self.size)).collect()
    }

    pub fn context(&self) -> &SceneContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SceneContext {
        &mut self.context
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::compositor::RecordingSurface;
    use crate::paint::Color;
    use crate::scene::{
        AmbientLight, Lights, MeshGeometry, PointLight, Scene, TrackedObject, TrackedObjectConfig,
    };

    const SPECS: [ViewSpec; 2] = [ViewSpec::new(0.0, 1.0, 0), ViewSpec::new(0.0, 0.0, 1)];

    fn context() -> SceneContext {
        let mut scene = Scene::new();
        let tracked = TrackedObject::build(
            &mut scene,
            [MeshGeometry::cuboid(1.0, 1.0, 1.0)],
            &TrackedObjectConfig::default(),
        );
        SceneContext {
            scene,
            tracked,
            lights: Lights {
                point: PointLight {
                    color: Color::WHITE,
                    intensity: 0.75,
                    position: Vec3::new(70.0, -20.0, 150.0),
                },
                ambient: AmbientLight {
                    color: Color::WHITE,
                    intensity: 1.5,
                },
            },
        }
    }

    fn compositor(w: u32, h: u32, surface: &mut RecordingSurface) -> ViewportCompositor {
        let framing = FramingConfig {
            screen_width: 1920.0,
            ..Default::default()
        };
        ViewportCompositor::initialize(&SPECS, SurfaceSize::new(w, h), framing, context(), surface)
    }

    #[test]
    fn initialize_renders_once_with_visible_views_only() {
        let mut surface = RecordingSurface::new();
        let c = compositor(800, 600, &mut surface);
        assert_eq!(surface.renders, 1);
        assert_eq!(surface.passes.len(), 1);
        assert_eq!(surface.passes[0].scissor, PixelRect::new(0, 0, 800, 600));
        assert_eq!(c.view_rects()[1], PixelRect::new(0, 0, 800, 0));
    }

    #[test]
    fn resize_sets_exact_aspect_and_bounded_rects() {
        let mut surface = RecordingSurface::new();
        let mut c = compositor(10, 10, &mut surface);
        for (w, h) in [(1, 1), (1, 1000), (1000, 1), (1280, 721), (3840, 2160)] {
            c.resize(SurfaceSize::new(w, h), &mut surface);
            for (view, rect) in c.views().iter().zip(c.view_rects()) {
                assert_eq!(view.camera.aspect, w as f32 / h as f32);
                assert!(rect.y + rect.height <= h, "{rect:?} exceeds {h}");
            }
            for pass in surface.last_render() {
                assert_eq!(pass.viewport, PixelRect::new(0, 0, w, h));
                assert_eq!(pass.aspect, w as f32 / h as f32);
            }
        }
    }

    #[test]
    fn resize_is_idempotent() {
        let mut surface = RecordingSurface::new();
        let mut c = compositor(800, 600, &mut surface);
        c.resize(SurfaceSize::new(1024, 512), &mut surface);
        let snapshot = |c: &ViewportCompositor, s: &RecordingSurface| {
            let cameras: Vec<_> = c.views().iter().map(|v| v.camera.clone()).collect();
            let passes: Vec<_> = s
                .last_render()
                .iter()
                .map(|p| (p.index, p.scissor, p.aspect, p.camera_z, p.drawn.clone()))
                .collect();
            (cameras, passes)
        };
        let once = snapshot(&c, &surface);

        c.resize(SurfaceSize::new(1024, 512), &mut surface);
        assert_eq!(snapshot(&c, &surface), once);
    }

    #[test]
    fn resize_pulls_camera_back_on_narrow_windows() {
        let mut surface = RecordingSurface::new();
        let mut c = compositor(1920, 1080, &mut surface);
        assert_eq!(c.views()[0].camera.position.z, 180.0);
        c.resize(SurfaceSize::new(600, 1080), &mut surface);
        assert_eq!(c.views()[0].camera.position.z, 440.0);
        assert_eq!(surface.last_render()[0].camera_z, 440.0);
    }

    #[test]
    fn reframe_follows_screen_and_scale_factor() {
        let mut surface = RecordingSurface::new();
        // 600 px wide: 440 at scale 1 on a 1920 screen.
        let mut c = compositor(600, 1080, &mut surface);
        let renders = surface.renders;

        assert!(c.reframe(1440.0, 2.0, &mut surface));
        assert_eq!(c.views()[0].camera.position.z, 380.0);
        assert_eq!(surface.last_render()[0].camera_z, 380.0);
        assert_eq!(surface.renders, renders + 1);

        assert!(!c.reframe(1440.0, 2.0, &mut surface));
        assert_eq!(surface.renders, renders + 1);
    }

    #[test]
    fn camera_keeps_its_aim_when_pulled_back() {
        let mut surface = RecordingSurface::new();
        let mut c = compositor(1920, 1080, &mut surface);
        let aim = c.views()[0].camera.orientation;
        c.resize(SurfaceSize::new(400, 1080), &mut surface);
        assert_eq!(c.views()[0].camera.orientation, aim);
    }

    #[test]
    fn zero_area_resize_keeps_previous_state() {
        let mut surface = RecordingSurface::new();
        let mut c = compositor(800, 600, &mut surface);
        c.resize(SurfaceSize::new(0, 600), &mut surface);
        c.resize(SurfaceSize::new(800, 0), &mut surface);
        assert_eq!(c.size(), SurfaceSize::new(800, 600));
        assert_eq!(surface.renders, 1);
        assert_eq!(c.views()[0].camera.aspect, 800.0 / 600.0);
    }

    #[test]
    fn fractions_floor_to_pixels() {
        let mut surface = RecordingSurface::new();
        let mut c = compositor(200, 101, &mut surface);
        for (b, h, expect) in [
            (0.0, 0.0, (0, 0)),
            (0.0, 1.0, (0, 101)),
            (1.0, 0.0, (101, 0)),
            (0.5, 0.5, (50, 50)),
        ] {
            let v = c.view_mut(1).unwrap();
            v.bottom = b;
            v.height = h;
            let r = c.view_rects()[1];
            assert_eq!((r.y, r.height), expect, "b={b} h={h}");
        }
    }

    #[test]
    fn layers_isolate_solid_and_wireframe() {
        let mut surface = RecordingSurface::new();
        let mut c = compositor(800, 600, &mut surface);
        c.view_mut(1).unwrap().height = 0.5;
        c.render(&mut surface);

        let tracked = c.context().tracked.clone();
        let passes = surface.last_render();
        assert_eq!(passes.len(), 2);
        assert_eq!(passes[0].drawn, tracked.meshes());
        assert_eq!(passes[1].drawn, vec![tracked.wireframe().unwrap()]);
    }

    #[test]
    fn views_draw_in_order_clipped_to_their_slices() {
        let mut surface = RecordingSurface::new();
        let mut c = compositor(800, 600, &mut surface);
        {
            let v = c.view_mut(1).unwrap();
            v.bottom = 0.25;
            v.height = 0.5;
        }
        c.render(&mut surface);
        let passes = surface.last_render();
        assert_eq!(passes.iter().map(|p| p.index).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(passes[1].scissor, PixelRect::new(0, 150, 800, 300));
    }

    #[test]
    fn overflowing_slice_is_clamped_and_offscreen_slice_skipped() {
        let mut surface = RecordingSurface::new();
        let mut c = compositor(800, 600, &mut surface);
        {
            let v = c.view_mut(1).unwrap();
            v.bottom = 0.5;
            v.height = 1.0;
        }
        c.render(&mut surface);
        assert_eq!(surface.last_render()[1].scissor, PixelRect::new(0, 300, 800, 300));

        c.view_mut(1).unwrap().bottom = 1.0;
        c.render(&mut surface);
        assert_eq!(surface.last_render().len(), 1);
    }

    #[test]
    fn tracked_transform_reaches_both_views() {
        let mut surface = RecordingSurface::new();
        let mut c = compositor(800, 600, &mut surface);
        let ctx = c.context_mut();
        let tracked = ctx.tracked.clone();
        tracked.transform_mut(&mut ctx.scene).unwrap().position.x = -40.0;

        let root = c.context().scene.world_matrix(tracked.root()).unwrap();
        assert_eq!(root.w_axis.x, -40.0);
    }
}
