use anyhow::{Context, Result};
use ouroboros::self_referencing;
use std::collections::HashMap;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::coords::Viewport;
use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};

/// How a window is presented when it is created.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum WindowState {
    #[default]
    Normal,
    Maximized,
    /// Exclusive fullscreen on the primary monitor's first video mode.
    FullScreen,
    BorderlessFullScreen,
    Hidden,
}

impl WindowState {
    fn apply(self, attrs: WindowAttributes, event_loop: &ActiveEventLoop) -> WindowAttributes {
        match self {
            WindowState::Normal => attrs,
            WindowState::Maximized => attrs.with_maximized(true),
            WindowState::FullScreen => {
                let mode = event_loop
                    .primary_monitor()
                    .and_then(|m| m.video_modes().next());
                let fullscreen = match mode {
                    Some(mode) => Fullscreen::Exclusive(mode),
                    None => {
                        log::warn!("no exclusive video mode available; using borderless fullscreen");
                        Fullscreen::Borderless(None)
                    }
                };
                attrs.with_fullscreen(Some(fullscreen))
            }
            WindowState::BorderlessFullScreen => attrs.with_fullscreen(Some(Fullscreen::Borderless(None))),
            WindowState::Hidden => attrs.with_visible(false),
        }
    }
}

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub window_state: WindowState,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "striked".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            window_state: WindowState::Normal,
            resizable: true,
        }
    }
}

/// Requests an application can make from inside a callback.
///
/// They are queued and applied once the callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    queued: Vec<Request>,
}

impl RuntimeCtx {
    pub fn create_window(&mut self, config: RuntimeConfig) {
        self.queued.push(Request::Open(config));
    }

    pub fn close_window(&mut self, id: WindowId) {
        self.queued.push(Request::Close(id));
    }

    pub fn exit(&mut self) {
        self.queued.push(Request::Exit);
    }

    fn take(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.queued)
    }
}

enum Request {
    Open(RuntimeConfig),
    Close(WindowId),
    Exit,
}

/// Opens the first window and runs the event loop until every window is
/// closed or the app asks to exit.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let mut host = Host {
            initial,
            gpu_init,
            app,
            slots: HashMap::new(),
            exiting: false,
        };
        event_loop.run_app(&mut host).context("event loop failed")?;
        Ok(())
    }
}

/// A window and the GPU context whose surface borrows it.
#[self_referencing]
struct WindowSlot {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl WindowSlot {
    fn open(event_loop: &ActiveEventLoop, config: RuntimeConfig, gpu_init: GpuInit) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title)
            .with_inner_size(config.initial_size)
            .with_resizable(config.resizable);
        let attrs = config.window_state.apply(attrs, event_loop);

        let window = event_loop.create_window(attrs).context("failed to create window")?;

        WindowSlotTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")
    }

    fn id(&self) -> WindowId {
        self.with_window(|w| w.id())
    }

    fn viewport(&self) -> Viewport {
        self.with_window(|w| logical_viewport(w.inner_size(), w.scale_factor()))
    }

    /// Reconfigures the surface to the window's current physical size.
    fn fit_surface(&mut self) {
        let size = self.with_window(|w| w.inner_size());
        self.with_gpu_mut(|gpu| gpu.resize(size));
        self.with_window(|w| w.request_redraw());
    }
}

fn logical_viewport(size: PhysicalSize<u32>, scale_factor: f64) -> Viewport {
    let logical: LogicalSize<f64> = size.to_logical(scale_factor);
    Viewport::new(logical.width as f32, logical.height as f32)
}

struct Host<A: App + 'static> {
    initial: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    slots: HashMap<WindowId, WindowSlot>,
    exiting: bool,
}

impl<A: App + 'static> Host<A> {
    fn open(&mut self, event_loop: &ActiveEventLoop, config: RuntimeConfig) {
        match WindowSlot::open(event_loop, config, self.gpu_init.clone()) {
            Ok(slot) => {
                let (id, viewport) = (slot.id(), slot.viewport());
                log::info!("window {id:?} opened at {}x{}", viewport.width, viewport.height);
                slot.with_window(|w| w.request_redraw());
                self.slots.insert(id, slot);
                self.app.on_viewport_changed(id, viewport);
            }
            Err(e) => {
                log::error!("{e:#}");
                self.exiting = true;
            }
        }
    }

    fn close(&mut self, id: WindowId) {
        if self.slots.contains_key(&id) {
            // The app releases its resources while the device is still alive.
            self.app.on_close(id);
            self.slots.remove(&id);
        }
        if self.slots.is_empty() {
            self.exiting = true;
        }
    }

    fn resized(&mut self, id: WindowId) {
        let Some(slot) = self.slots.get_mut(&id) else { return };
        slot.fit_surface();
        let viewport = slot.viewport();
        self.app.on_viewport_changed(id, viewport);
    }

    /// Runs one frame and returns what the app queued during it.
    fn redraw(&mut self, id: WindowId) -> Vec<Request> {
        let Some(slot) = self.slots.get_mut(&id) else { return Vec::new() };
        let app = &mut self.app;
        let mut runtime = RuntimeCtx::default();

        let control = slot.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: WindowCtx { id, window: fields.window },
                gpu: fields.gpu,
                runtime: &mut runtime,
            };
            app.on_frame(&mut ctx)
        });
        if control == AppControl::Exit {
            runtime.exit();
        }

        runtime.take()
    }

    fn apply(&mut self, event_loop: &ActiveEventLoop, requests: Vec<Request>) {
        for request in requests {
            match request {
                Request::Open(config) => self.open(event_loop, config),
                Request::Close(id) => self.close(id),
                Request::Exit => self.exiting = true,
            }
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        let ids: Vec<WindowId> = self.slots.keys().copied().collect();
        for id in ids {
            self.close(id);
        }
        event_loop.exit();
    }
}

impl<A: App + 'static> ApplicationHandler for Host<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.slots.is_empty() {
            self.open(event_loop, self.initial.clone());
        }
        if self.exiting {
            self.shutdown(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exiting {
            self.shutdown(event_loop);
            return;
        }
        event_loop.set_control_flow(ControlFlow::Wait);
        for slot in self.slots.values() {
            slot.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if !self.slots.contains_key(&id) {
            return;
        }

        if self.app.on_window_event(id, &event) == AppControl::Exit {
            self.exiting = true;
        } else {
            match event {
                WindowEvent::CloseRequested => self.close(id),
                WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => self.resized(id),
                WindowEvent::RedrawRequested => {
                    let requests = self.redraw(id);
                    self.apply(event_loop, requests);
                }
                _ => {}
            }
        }

        if self.exiting {
            self.shutdown(event_loop);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_is_logical() {
        let v = logical_viewport(PhysicalSize::new(2560, 1440), 2.0);
        assert_eq!(v, Viewport::new(1280.0, 720.0));
    }

    #[test]
    fn default_config_is_a_normal_resizable_window() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.window_state, WindowState::Normal);
        assert!(cfg.resizable);
        assert_eq!(cfg.title, "striked");
    }
}
