//! Windowed demo: a sphere shaded by an animated noise shader.

use std::num::NonZeroU32;
use std::time::Instant;

use glutin::surface::SwapInterval;
use log::{error, info};
use winit::dpi::LogicalSize;
use winit::event_loop::EventLoopWindowTarget;
use winit::keyboard::Key;
use winit::window::{Window, WindowBuilder};

use crate::app::{Flow, Harness};
use crate::camera;
use crate::config::DemoArgs;
use crate::error::Result;
use crate::geometry::Mesh;
use crate::meter::ThroughputMeter;
use crate::renderer::{FrameUniforms, Renderer};
use crate::shaders::ShaderPair;

pub const TITLE: &str = "GLSL Noise Demo";
pub const SPHERE_SLICES: u16 = 20;
pub const SPHERE_STACKS: u16 = 20;

pub struct NoiseDemo {
    args: DemoArgs,
    shaders: ShaderPair,
    meter: ThroughputMeter,
    viewport: (u32, u32),
    started: Instant,
}

impl NoiseDemo {
    pub fn new(args: DemoArgs) -> Self {
        Self {
            shaders: ShaderPair::new(&args.shader_dir, &args.vertex, &args.fragment),
            viewport: (args.width, args.height),
            args,
            meter: ThroughputMeter::new(),
            started: Instant::now(),
        }
    }

    /// Rebuilds the program from disk. On failure the previous one keeps running.
    fn reload(&mut self, renderer: &mut Renderer) {
        match self.shaders.load().and_then(|sources| renderer.load_program(&sources)) {
            Ok(()) => info!("Reloaded {}", self.shaders.fragment.display()),
            Err(err) => error!("{err}"),
        }
    }
}

impl Harness for NoiseDemo {
    fn window_builder(&mut self, _target: &EventLoopWindowTarget<()>) -> WindowBuilder {
        WindowBuilder::new()
            .with_title(TITLE)
            .with_inner_size(LogicalSize::new(self.args.width, self.args.height))
    }

    fn mesh(&self) -> Mesh {
        Mesh::sphere(1.0, SPHERE_SLICES, SPHERE_STACKS)
    }

    fn swap_interval(&self) -> SwapInterval {
        if self.args.no_vsync {
            SwapInterval::DontWait
        } else {
            SwapInterval::Wait(NonZeroU32::MIN)
        }
    }

    fn init(&mut self, renderer: &mut Renderer, _window: &Window) -> Result<()> {
        renderer.set_depth_test(true);
        let sources = self.shaders.load()?;
        renderer.load_program(&sources)?;
        self.started = Instant::now();
        Ok(())
    }

    fn resized(&mut self, renderer: &mut Renderer, width: u32, height: u32) {
        self.viewport = (width, height);
        renderer.resize(width, height);
    }

    fn key_pressed(&mut self, key: &Key, renderer: &mut Renderer) -> Result<Flow> {
        if let Key::Character(c) = key {
            if c.eq_ignore_ascii_case("r") {
                self.reload(renderer);
            }
        }
        Ok(Flow::Continue)
    }

    fn frame(&mut self, renderer: &mut Renderer, window: &Window) -> Result<Flow> {
        let elapsed = self.started.elapsed();
        let (width, height) = self.viewport;
        let pixels = u64::from(width) * u64::from(height);
        if let Some(report) = self.meter.tick(elapsed, pixels) {
            info!("{:.1} fps ({:.1} M samples/s)", report.fps, report.msamples_per_sec);
            window.set_title(&format!("{TITLE} ({:.1} fps)", report.fps));
        }

        renderer.draw(&FrameUniforms {
            mvp: camera::demo_view_projection(width, height),
            time: elapsed.as_secs_f32(),
            clear: true,
        });
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn shader_paths_resolve_against_the_shader_dir() {
        let args = DemoArgs::try_parse_from([
            "noisedemo",
            "--shader-dir",
            "assets",
            "--fragment",
            "marble.frag",
        ])
        .unwrap();
        let demo = NoiseDemo::new(args);
        assert_eq!(demo.shaders.vertex, PathBuf::from("assets").join("noisedemo.vert"));
        assert_eq!(demo.shaders.fragment, PathBuf::from("assets").join("marble.frag"));
        assert_eq!(demo.viewport, (512, 512));
    }

    #[test]
    fn demo_mesh_is_the_tessellated_sphere() {
        let demo = NoiseDemo::new(DemoArgs::try_parse_from(["noisedemo"]).unwrap());
        let mesh = demo.mesh();
        assert_eq!(mesh.vertices.len(), 21 * 21);
        assert!(matches!(demo.swap_interval(), SwapInterval::Wait(_)));
    }
}
