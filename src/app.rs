//! Event loop shared by the benchmark and the demo.

use glutin::config::Config;
use glutin::context::NotCurrentContext;
use glutin::display::GetGlDisplay;
use glutin::surface::SwapInterval;
use log::{error, info};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoopBuilder, EventLoopWindowTarget};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use crate::context::{self, GlState};
use crate::error::{Error, Result};
use crate::geometry::Mesh;
use crate::renderer::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// What a program plugs into the shared loop.
pub trait Harness {
    fn window_builder(&mut self, target: &EventLoopWindowTarget<()>) -> WindowBuilder;

    fn mesh(&self) -> Mesh;

    fn swap_interval(&self) -> SwapInterval;

    /// Called once, with the context current, before the first frame.
    fn init(&mut self, renderer: &mut Renderer, window: &Window) -> Result<()>;

    fn resized(&mut self, renderer: &mut Renderer, width: u32, height: u32) {
        renderer.resize(width, height);
    }

    fn key_pressed(&mut self, _key: &Key, _renderer: &mut Renderer) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Draws one frame. Buffers are swapped by the caller.
    fn frame(&mut self, renderer: &mut Renderer, window: &Window) -> Result<Flow>;

    /// Called after the loop ended without error.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

pub fn run<H: Harness>(harness: H) -> Result<()> {
    let event_loop = EventLoopBuilder::new().build()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut harness = harness;
    let window_builder = harness.window_builder(&event_loop);
    let (window, gl_config, context) = context::create(&event_loop, window_builder)?;

    let mut app = App {
        harness,
        renderer: None,
        state: None,
        window,
        not_current: Some(context),
        gl_config,
        failure: None,
    };
    event_loop.run(|event, target| app.handle(event, target))?;
    app.finish()
}

struct App<H> {
    harness: H,
    // Declared before `state` so GL objects go away while the context is alive.
    renderer: Option<Renderer>,
    state: Option<GlState>,
    window: Option<Window>,
    not_current: Option<NotCurrentContext>,
    gl_config: Config,
    failure: Option<Error>,
}

impl<H: Harness> App<H> {
    fn handle(&mut self, event: Event<()>, target: &EventLoopWindowTarget<()>) {
        let result = match event {
            Event::Resumed => self.resume(target),
            Event::Suspended => self.suspend(),
            Event::WindowEvent { event, .. } => self.window_event(event),
            Event::AboutToWait => self.redraw(),
            _ => Ok(Flow::Continue),
        };
        match result {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => target.exit(),
            Err(err) => {
                error!("{err}");
                self.failure.get_or_insert(err);
                target.exit();
            }
        }
    }

    fn resume(&mut self, target: &EventLoopWindowTarget<()>) -> Result<Flow> {
        #[cfg(android_platform)]
        info!("Android window available");

        let Some(context) = self.not_current.take() else {
            return Ok(Flow::Continue);
        };
        let window = match self.window.take() {
            Some(window) => window,
            None => {
                let window_builder = self.harness.window_builder(target);
                glutin_winit::finalize_window(target, window_builder, &self.gl_config)?
            }
        };
        let state = GlState::bind(&self.gl_config, window, context, self.harness.swap_interval())?;

        if self.renderer.is_none() {
            let mut renderer = Renderer::new(&self.gl_config.display(), &self.harness.mesh())?;
            let size = state.window.inner_size();
            self.harness.resized(&mut renderer, size.width, size.height);
            self.harness.init(&mut renderer, &state.window)?;
            self.renderer = Some(renderer);
        }
        self.state = Some(state);
        Ok(Flow::Continue)
    }

    fn suspend(&mut self) -> Result<Flow> {
        info!("Window removed");
        if let Some(state) = self.state.take() {
            self.not_current = Some(state.unbind()?);
        }
        Ok(Flow::Continue)
    }

    fn window_event(&mut self, event: WindowEvent) -> Result<Flow> {
        match event {
            WindowEvent::CloseRequested => Ok(Flow::Exit),
            WindowEvent::Resized(size) => {
                if let (Some(state), Some(renderer)) = (&self.state, self.renderer.as_mut()) {
                    if state.resize(size.width, size.height) {
                        self.harness.resized(renderer, size.width, size.height);
                    }
                }
                Ok(Flow::Continue)
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if logical_key == Key::Named(NamedKey::Escape) {
                    return Ok(Flow::Exit);
                }
                match self.renderer.as_mut() {
                    Some(renderer) => self.harness.key_pressed(&logical_key, renderer),
                    None => Ok(Flow::Continue),
                }
            }
            _ => Ok(Flow::Continue),
        }
    }

    fn redraw(&mut self) -> Result<Flow> {
        let (Some(state), Some(renderer)) = (&self.state, self.renderer.as_mut()) else {
            return Ok(Flow::Continue);
        };
        let flow = self.harness.frame(renderer, &state.window)?;
        state.window.request_redraw();
        state.swap_buffers()?;
        Ok(flow)
    }

    fn finish(mut self) -> Result<()> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        self.harness.finish()
    }
}
