use std::time::Duration;

use blueprint_engine::compositor::FramingConfig;
use blueprint_engine::coords::SurfaceSize;
use blueprint_engine::core::{App, AppControl, FrameCtx, RedrawPolicy, WindowCtx};
use blueprint_engine::device::Gpu;
use blueprint_engine::input::Key;
use blueprint_engine::paint::Color;
use blueprint_engine::render::{OverlayRenderer, SceneRenderer};

use crate::config::ShowcaseConfig;
use crate::overlay::{self, OverlayState, BACKDROP};
use crate::page::Page;
use crate::stage::Stage;

/// How often a pending model load is checked.
const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct ShowcaseApp {
    config: ShowcaseConfig,
    framing: FramingConfig,
    stage: Stage,
    scene: Option<SceneRenderer>,
    overlay: OverlayRenderer,
}

impl ShowcaseApp {
    /// Starts loading the model right away; the window opens meanwhile.
    pub fn new(config: ShowcaseConfig) -> Self {
        let stage = Stage::load(&config);
        Self {
            config,
            framing: FramingConfig::default(),
            stage,
            scene: None,
            overlay: OverlayRenderer::new(),
        }
    }
}

fn scene_renderer<'s>(slot: &'s mut Option<SceneRenderer>, gpu: &Gpu<'_>) -> &'s mut SceneRenderer {
    slot.get_or_insert_with(|| {
        SceneRenderer::new(gpu.device(), gpu.canvas_format(), gpu.depth_format())
    })
}

impl App for ShowcaseApp {
    fn on_resize(&mut self, _window: WindowCtx<'_>, gpu: &mut Gpu<'_>, size: SurfaceSize) -> AppControl {
        if let Some(showcase) = self.stage.showcase_mut() {
            let renderer = scene_renderer(&mut self.scene, gpu);
            let mut target = renderer.target(gpu.device(), gpu.queue(), size);
            showcase.resize(size, &mut target);
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.keys_pressed.contains(&Key::Escape) {
            return AppControl::Exit;
        }

        // Camera framing follows the monitor and scale factor; both must be
        // known before the compositor is built. An unknown monitor keeps the
        // last width.
        if let Some(width) = ctx.window.monitor_width() {
            self.framing.screen_width = width;
        }
        self.framing.scale_factor = ctx.window.scale_factor();

        let size = ctx.gpu.size();
        let viewport = ctx.window.logical_size();
        {
            let gpu = &*ctx.gpu;
            let renderer = scene_renderer(&mut self.scene, gpu);
            let mut target = renderer.target(gpu.device(), gpu.queue(), size);

            self.stage.poll(&self.config, size, self.framing.clone(), &mut target);

            if let Some(showcase) = self.stage.showcase_mut() {
                showcase.reframe(&self.framing, &mut target);
                let shift = ctx.input.modifiers.shift;
                showcase.apply_input(ctx.input_frame, viewport.y, shift, &mut target);
                showcase.advance(ctx.time.dt, &mut target);
            }
        }

        let (layers, (opacity, offset_x)) = match self.stage.showcase_mut() {
            Some(showcase) => (showcase.overlay_layers(viewport), showcase.canvas_style()),
            None => (
                overlay::layout(&OverlayState::default(), &Page::showcase(), viewport),
                (0.0, 0.0),
            ),
        };

        let (scene, overlay) = (&mut self.scene, &mut self.overlay);
        ctx.render(Color::from_hex(BACKDROP), |rctx, target| {
            overlay.prepare(rctx, &[&layers.back, &layers.front]);
            overlay.draw(rctx, target, 0);
            if let Some(scene) = scene.as_mut() {
                scene.composite(rctx, target, opacity, offset_x);
            }
            overlay.draw(rctx, target, 1);
        })
    }

    fn redraw_policy(&self) -> RedrawPolicy {
        match &self.stage {
            Stage::Loading(_) => RedrawPolicy::PollAfter(LOAD_POLL_INTERVAL),
            Stage::Ready(showcase) if showcase.is_animating() => RedrawPolicy::Continuous,
            _ => RedrawPolicy::Idle,
        }
    }
}
