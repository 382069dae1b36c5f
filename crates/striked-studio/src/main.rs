use std::rc::Rc;

use anyhow::Result;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use striked_engine::canvas::{Canvas, CanvasPainter};
use striked_engine::coords::{Vec2, Vec4};
use striked_engine::core::{App, AppControl, FrameCtx};
use striked_engine::device::GpuInit;
use striked_engine::logging::{init_logging, LoggingConfig};
use striked_engine::paint::Color;
use striked_engine::render::WgpuRenderer;
use striked_engine::scene::Stage;
use striked_engine::text::{Font, FontImportConfig, FontSource};
use striked_engine::texture::{BitmapTexture, TextureSource};
use striked_engine::window::{Runtime, RuntimeConfig};

const FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
];

fn load_font() -> Option<Rc<dyn FontSource>> {
    let Some(bytes) = FONT_PATHS.iter().find_map(|p| std::fs::read(p).ok()) else {
        log::warn!("no system font found; text is not drawn");
        return None;
    };

    match Font::from_bytes(&bytes, &FontImportConfig::default()) {
        Ok(font) => Some(Rc::new(font)),
        Err(e) => {
            log::warn!("font import failed: {e}");
            None
        }
    }
}

/// GPU-side state, created on the first frame once a device exists.
struct Scene {
    renderer: WgpuRenderer,
    stage: Stage,
}

struct Studio {
    font: Option<Rc<dyn FontSource>>,
    checker: Option<Rc<dyn TextureSource>>,
    scene: Option<Scene>,
}

impl Studio {
    fn new() -> Self {
        let checker = match BitmapTexture::checkerboard(8, 8, 16, [230, 230, 230, 255], [90, 90, 110, 255]) {
            Ok(tex) => Some(Rc::new(tex) as Rc<dyn TextureSource>),
            Err(e) => {
                log::warn!("checkerboard texture unavailable: {e}");
                None
            }
        };

        Self { font: load_font(), checker, scene: None }
    }

    fn build_stage(&self) -> Stage {
        let mut stage = Stage::new();

        let font = self.font.clone();
        stage.add_2d(Canvas::from_fn(move |p: &mut CanvasPainter<'_>| {
            let panel = Color::from_srgb_u8(32, 36, 48, 255);
            let accent = Color::from_srgb_u8(120, 170, 255, 255);

            p.draw_rect(panel, Vec2::new(40.0, 40.0), Vec2::new(420.0, 180.0));
            p.draw_rect_border(accent, Vec2::new(40.0, 40.0), Vec2::new(460.0, 220.0), 2.0);

            let title = "striked canvas";
            let width = p.text_width(font.as_ref(), 28.0, title);
            p.draw_text(font.as_ref(), Color::WHITE, Vec2::new(250.0 - width * 0.5, 70.0), 28.0, title);
            p.draw_text(font.as_ref(), accent, Vec2::new(60.0, 130.0), 16.0, "batched rects, lines and SDF text");

            p.draw_line(accent, Vec2::new(60.0, 180.0), Vec2::new(440.0, 180.0), 1.0, 1.0);
        }));

        if let Some(checker) = self.checker.clone() {
            stage.add_2d(Canvas::from_fn(move |p: &mut CanvasPainter<'_>| {
                p.draw_texture_rect(&checker, Vec2::new(500.0, 40.0), Vec2::new(180.0, 180.0));
                p.draw_texture_rect_modulated(
                    &checker,
                    Vec2::new(700.0, 40.0),
                    Vec2::new(90.0, 90.0),
                    Vec4::new(1.0, 0.6, 0.45, 1.0),
                );
            }));
        }

        stage
    }
}

impl App for Studio {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput { event, .. } = event
            && event.state == ElementState::Pressed
            && event.logical_key == Key::Named(NamedKey::Escape)
        {
            return AppControl::Exit;
        }
        AppControl::Continue
    }

    fn on_close(&mut self, _window_id: WindowId) {
        if let Some(mut scene) = self.scene.take() {
            scene.stage.dispose(&mut scene.renderer);
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let clear = Color::from_srgb_u8(18, 20, 26, 255);
        let stage = if self.scene.is_none() { Some(self.build_stage()) } else { None };
        let scene = &mut self.scene;

        ctx.render(clear, |rctx, target| {
            if scene.is_none() {
                match WgpuRenderer::new(rctx.device, rctx.queue, rctx.surface_format) {
                    Ok(renderer) => {
                        *scene = Some(Scene { renderer, stage: stage.unwrap_or_default() });
                    }
                    Err(e) => {
                        log::error!("renderer creation failed: {e}");
                        return;
                    }
                }
            }
            let Some(scene) = scene.as_mut() else { return };

            scene.renderer.begin_frame(rctx);
            match scene.stage.frame(&mut scene.renderer, rctx.viewport, None) {
                Ok(stats) => log::trace!("frame: {} draws, {} skipped", stats.draw_calls, stats.skipped),
                Err(e) => log::error!("frame failed: {e}"),
            }
            scene.renderer.flush(target);
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "striked studio".to_string(),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), Studio::new())
}
