use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::coords::Viewport;

use super::ctx::FrameCtx;

/// Whether the host loop keeps running after a callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Callbacks the window runtime drives.
///
/// Redraws are continuous: `on_frame` runs for every redraw and normally
/// walks a [`Stage`](crate::scene::Stage) inside
/// [`FrameCtx::render`]. Canvases rebuild their batch only after
/// `update_canvas`, so a static scene costs one bind and draw pass per frame.
pub trait App {
    /// The logical size of `window_id` changed (resize or DPI change).
    ///
    /// The next `on_frame` renders with this viewport; layout that depends on
    /// it should invalidate its canvases here.
    fn on_viewport_changed(&mut self, window_id: WindowId, viewport: Viewport) {
        let _ = (window_id, viewport);
    }

    /// Raw window events, before the runtime handles resize/close itself.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// `window_id` is about to be destroyed along with its GPU device.
    /// Release renderer-owned resources created for it.
    fn on_close(&mut self, window_id: WindowId) {
        let _ = window_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Minimal {
        viewports: Vec<Viewport>,
    }

    impl App for Minimal {
        fn on_viewport_changed(&mut self, _window_id: WindowId, viewport: Viewport) {
            self.viewports.push(viewport);
        }

        fn on_frame(&mut self, _ctx: &mut FrameCtx<'_, '_>) -> AppControl {
            AppControl::Continue
        }
    }

    #[test]
    fn optional_hooks_default_to_continue() {
        let mut app = Minimal::default();
        let id = WindowId::dummy();

        assert_eq!(app.on_window_event(id, &WindowEvent::Focused(true)), AppControl::Continue);
        app.on_close(id);
        app.on_viewport_changed(id, Viewport::new(640.0, 360.0));
        assert_eq!(app.viewports, vec![Viewport::new(640.0, 360.0)]);
    }
}
