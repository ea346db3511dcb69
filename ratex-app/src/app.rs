use anyhow::Result;
use pixels::{Pixels, SurfaceTexture};
use ratex_core::{ResponseRecord, TrialConfig};
use ratex_render::{SkiaSurface, load_system_font};
use ratex_timing::HighPrecisionTimer;
use ratex_trial::{ControllerOptions, TrialController, TrialEvent, begin_trial};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

/// Windowed host for one trial: renders the surface, translates pointer
/// input into controller events, prints the finalized record, exits.
pub struct App {
    config: TrialConfig,
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    surface: Option<SkiaSurface>,
    controller: Option<TrialController<HighPrecisionTimer>>,
    record: Option<ResponseRecord>,
    cursor: (f32, f32),
    dragging: bool,
    should_exit: bool,
}

impl App {
    pub fn new(config: TrialConfig) -> Result<Self> {
        Ok(Self {
            config,
            window: None,
            pixels: None,
            surface: None,
            controller: None,
            record: None,
            cursor: (0.0, 0.0),
            dragging: false,
            should_exit: false,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        println!("=== IMAGE-WORD SLIDER TRIAL ===");
        println!("Platform: {}", std::env::consts::OS);
        println!("Drag the sliders, then click the submit button. ESC aborts.\n");
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn create_window_and_trial(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("ratex")
            .with_inner_size(LogicalSize::new(1280.0, 800.0))
            .with_resizable(false);
        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let physical_size = window.inner_size();

        let surface_texture =
            SurfaceTexture::new(physical_size.width, physical_size.height, window.clone());
        self.pixels = Some(Pixels::new(
            physical_size.width,
            physical_size.height,
            surface_texture,
        )?);

        let mut surface = SkiaSurface::render(
            &self.config,
            physical_size.width,
            physical_size.height,
            load_system_font(),
        )?;

        // Asset resolution is the host's job; the surface only gets pixels.
        match image::open(&self.config.stimulus_image) {
            Ok(img) => {
                let rgba = img.into_rgba8();
                let (w, h) = rgba.dimensions();
                surface.set_stimulus_pixels(rgba.as_raw(), w, h)?;
            }
            Err(e) => eprintln!(
                "stimulus image `{}` not loaded ({e}), using placeholder",
                self.config.stimulus_image
            ),
        }

        let controller = begin_trial(
            &mut surface,
            self.config.clone(),
            ControllerOptions::default(),
            HighPrecisionTimer::new(),
            Some(|| println!("Trial surface ready, awaiting response.")),
        )?;

        self.surface = Some(surface);
        self.controller = Some(controller);
        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        if let (Some(pixels), Some(surface)) = (&mut self.pixels, &self.surface) {
            surface.copy_to_frame(pixels.frame_mut());
            pixels.render()?;
        }
        Ok(())
    }

    fn feed(&mut self, event: TrialEvent) {
        let (Some(controller), Some(surface)) = (&mut self.controller, &mut self.surface) else {
            return;
        };
        match controller.handle_event(event, surface) {
            Ok(Some(record)) => {
                println!(
                    "Response recorded, RT = {} ms",
                    record.elapsed_response_time
                );
                self.record = Some(record);
                self.should_exit = true;
            }
            Ok(None) => {}
            Err(e) => eprintln!("trial event rejected: {e}"),
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn pointer_pressed(&mut self) {
        let Some(surface) = &self.surface else {
            return;
        };
        let (x, y) = self.cursor;
        if surface.button_contains(x, y) {
            self.feed(TrialEvent::SubmitPressed);
        } else if let Some((index, value)) = surface.slider_at(x, y) {
            self.dragging = true;
            self.feed(TrialEvent::ValueChanged { index, value });
        }
    }

    fn pointer_moved(&mut self) {
        if !self.dragging {
            return;
        }
        let Some(surface) = &self.surface else {
            return;
        };
        let (x, y) = self.cursor;
        if let Some((index, value)) = surface.slider_at(x, y) {
            self.feed(TrialEvent::ValueChanged { index, value });
        }
    }

    fn cleanup_and_exit(&mut self, event_loop: &ActiveEventLoop) {
        match &self.record {
            Some(_) => println!("\nTrial complete."),
            None => {
                let state = self.controller.as_ref().map(|c| c.state());
                println!("\nWindow closed in {state:?} with no submission.");
            }
        }
        self.should_exit = true;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_trial(event_loop) {
                eprintln!("Failed to start trial: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.cleanup_and_exit(event_loop),
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    eprintln!("render failed: {e}");
                    event_loop.exit();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                self.pointer_moved();
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.pointer_pressed(),
                ElementState::Released => self.dragging = false,
            },
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() => {
                use winit::keyboard::{KeyCode, PhysicalKey};
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                    self.cleanup_and_exit(event_loop);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
        }
    }
}
