use std::time::Duration;

use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::coords::SurfaceSize;
use crate::device::Gpu;

use super::ctx::{FrameCtx, WindowCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// When the runtime should schedule the next frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RedrawPolicy {
    /// Redraw every iteration of the event loop.
    Continuous,
    /// Redraw once the given time has passed since the last frame.
    PollAfter(Duration),
    /// Redraw only on input, resize or an explicit request.
    Idle,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called for window events.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called after the surface has been reconfigured to a new non-zero size,
    /// before the redraw that follows it.
    fn on_resize(&mut self, window: WindowCtx<'_>, gpu: &mut Gpu<'_>, size: SurfaceSize) -> AppControl {
        let _ = (window, gpu, size);
        AppControl::Continue
    }

    /// Called once per rendered frame per window.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Consulted after every frame.
    fn redraw_policy(&self) -> RedrawPolicy {
        RedrawPolicy::Continuous
    }
}
