use std::num::NonZeroU32;

use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributes, ContextAttributesBuilder, GlProfile, NotCurrentContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{info, warn};
use raw_window_handle::{HasRawWindowHandle, RawWindowHandle};
use winit::event_loop::EventLoopWindowTarget;
use winit::window::{Window, WindowBuilder};

use crate::error::{Error, Result};

/// Creates the window together with a matching GL config and a context that is
/// not yet bound to any surface.
pub fn create(
    event_loop: &EventLoopWindowTarget<()>,
    window_builder: WindowBuilder,
) -> Result<(Option<Window>, Config, NotCurrentContext)> {
    // Only Windows requires the window to be present before creating the display.
    let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
    let template = ConfigTemplateBuilder::new();

    let (window, gl_config) = display_builder
        .build(event_loop, template, pick_config)
        .map_err(|err| Error::Display(err.to_string()))?;
    info!("Picked a config with {} samples", gl_config.num_samples());

    let window_handle = window.as_ref().map(|window| window.raw_window_handle());
    let gl_display = gl_config.display();

    let mut last_err = None;
    for request in CONTEXT_REQUESTS {
        let attributes = request.attributes(window_handle);
        match unsafe { gl_display.create_context(&gl_config, &attributes) } {
            Ok(context) => return Ok((window, gl_config, context)),
            Err(err) => {
                warn!("{request:?} context failed: {err}");
                last_err = Some(err);
            }
        }
    }
    Err(last_err.map_or(Error::Unsupported("no usable GL context"), Error::Gl))
}

/// Context kinds tried in order. Both are desktop GL: the shaders need GLSL 1.50.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContextRequest {
    Core32,
    PlatformDefault,
}

const CONTEXT_REQUESTS: [ContextRequest; 2] =
    [ContextRequest::Core32, ContextRequest::PlatformDefault];

impl ContextRequest {
    fn api(self) -> Option<ContextApi> {
        match self {
            ContextRequest::Core32 => Some(ContextApi::OpenGl(Some(Version::new(3, 2)))),
            ContextRequest::PlatformDefault => None,
        }
    }

    fn profile(self) -> Option<GlProfile> {
        match self {
            ContextRequest::Core32 => Some(GlProfile::Core),
            ContextRequest::PlatformDefault => None,
        }
    }

    fn attributes(self, window_handle: Option<RawWindowHandle>) -> ContextAttributes {
        let mut builder = ContextAttributesBuilder::new();
        if let Some(profile) = self.profile() {
            builder = builder.with_profile(profile);
        }
        if let Some(api) = self.api() {
            builder = builder.with_context_api(api);
        }
        builder.build(window_handle)
    }
}

// Benchmark figures assume one sample per pixel, so prefer the least multisampled config.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|accum, config| {
            if config.num_samples() < accum.num_samples() {
                config
            } else {
                accum
            }
        })
        .expect("the display offered no GL configs")
}

/// A window with its surface and the context current on it.
pub struct GlState {
    pub context: PossiblyCurrentContext,
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlState {
    pub fn bind(
        gl_config: &Config,
        window: Window,
        context: NotCurrentContext,
        swap_interval: SwapInterval,
    ) -> Result<Self> {
        let attrs = window.build_surface_attributes(Default::default());
        let surface = unsafe {
            gl_config
                .display()
                .create_window_surface(gl_config, &attrs)?
        };
        let context = context.make_current(&surface)?;

        if let Err(res) = surface.set_swap_interval(&context, swap_interval) {
            warn!("Error setting swap interval {swap_interval:?}: {res}");
        }

        Ok(Self {
            context,
            surface,
            window,
        })
    }

    /// Zero-sized requests (minimized windows) are ignored.
    pub fn resize(&self, width: u32, height: u32) -> bool {
        match (NonZeroU32::new(width), NonZeroU32::new(height)) {
            (Some(width), Some(height)) => {
                self.surface.resize(&self.context, width, height);
                true
            }
            _ => false,
        }
    }

    pub fn swap_buffers(&self) -> Result<()> {
        self.surface.swap_buffers(&self.context)?;
        Ok(())
    }

    /// Drops the surface and window, keeping the context for the next resume.
    pub fn unbind(self) -> Result<NotCurrentContext> {
        Ok(self.context.make_not_current()?)
    }
}
