//! Fullscreen throughput benchmark over 2D, 3D and 4D noise.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use glutin::surface::SwapInterval;
use log::info;
use winit::dpi::PhysicalSize;
use winit::event_loop::EventLoopWindowTarget;
use winit::window::{Fullscreen, Window, WindowBuilder};

use crate::app::{Flow, Harness};
use crate::camera;
use crate::config::BenchArgs;
use crate::error::{Error, Result};
use crate::geometry::Mesh;
use crate::meter::ThroughputMeter;
use crate::renderer::{FrameUniforms, Renderer};
use crate::report::BenchLog;
use crate::schedule::{Schedule, Stage, Step, DEFAULT_STAGES, VERTEX_SHADER_FILE};
use crate::shaders::ShaderPair;

pub const TITLE: &str = "GLSL simplex noise";

pub struct NoiseBench {
    args: BenchArgs,
    log_path: PathBuf,
    log: Option<BenchLog<BufWriter<File>>>,
    schedule: Schedule,
    meter: ThroughputMeter,
    desktop: (u32, u32),
    started: Option<Instant>,
}

impl NoiseBench {
    pub fn new(args: BenchArgs) -> Self {
        Self {
            log_path: args.log_path(),
            schedule: Schedule::new(DEFAULT_STAGES, args.stage_duration),
            args,
            log: None,
            meter: ThroughputMeter::new(),
            desktop: (0, 0),
            started: None,
        }
    }

    fn shaders(&self, stage: Stage) -> ShaderPair {
        ShaderPair::new(&self.args.shader_dir, VERTEX_SHADER_FILE, stage.fragment_file())
    }

    fn start_stage(&mut self, renderer: &mut Renderer, stage: Stage) -> Result<()> {
        let sources = self.shaders(stage).load()?;
        renderer.load_program(&sources)?;
        info!("Running {stage}");
        self.with_log(|log, version| log.begin_stage(stage, version))
    }

    fn with_log<F>(&mut self, write: F) -> Result<()>
    where
        F: FnOnce(&mut BenchLog<BufWriter<File>>, &str) -> std::io::Result<()>,
    {
        let Some(log) = self.log.as_mut() else {
            return Ok(());
        };
        write(log, &self.args.noise_version).map_err(|source| Error::Log {
            path: self.log_path.clone(),
            source,
        })
    }

    fn elapsed(&self) -> Duration {
        self.started.map_or(Duration::ZERO, |started| started.elapsed())
    }
}

fn desktop_or(known: (u32, u32), lookup: impl FnOnce() -> Option<(u32, u32)>) -> (u32, u32) {
    if known != (0, 0) {
        return known;
    }
    lookup().unwrap_or(known)
}

impl Harness for NoiseBench {
    fn window_builder(&mut self, target: &EventLoopWindowTarget<()>) -> WindowBuilder {
        let builder = WindowBuilder::new().with_title(TITLE);
        let monitor = target.primary_monitor();
        if let Some(monitor) = &monitor {
            let size = monitor.size();
            self.desktop = (size.width, size.height);
        }
        if self.args.windowed {
            builder.with_inner_size(PhysicalSize::new(self.args.width, self.args.height))
        } else {
            builder.with_fullscreen(Some(Fullscreen::Borderless(monitor)))
        }
    }

    fn mesh(&self) -> Mesh {
        Mesh::quad()
    }

    fn swap_interval(&self) -> SwapInterval {
        if self.args.vsync {
            SwapInterval::Wait(std::num::NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        }
    }

    fn init(&mut self, renderer: &mut Renderer, window: &Window) -> Result<()> {
        // Wayland has no primary monitor before the window exists.
        self.desktop = desktop_or(self.desktop, || {
            window
                .current_monitor()
                .or_else(|| window.available_monitors().next())
                .map(|monitor| {
                    let size = monitor.size();
                    (size.width, size.height)
                })
        });

        let mut log = BenchLog::create(&self.log_path)?;
        log.header(renderer.info(), self.desktop)
            .map_err(|source| Error::Log {
                path: self.log_path.clone(),
                source,
            })?;
        self.log = Some(log);
        info!("Logging to {}", self.log_path.display());

        // Raw fill-rate test: no depth, no clears.
        renderer.set_depth_test(false);

        let first = self
            .schedule
            .current()
            .ok_or(Error::Unsupported("no benchmark stages"))?;
        self.start_stage(renderer, first)?;
        self.started = Some(Instant::now());
        Ok(())
    }

    fn frame(&mut self, renderer: &mut Renderer, window: &Window) -> Result<Flow> {
        let elapsed = self.elapsed();
        let size = window.inner_size();
        let pixels = u64::from(size.width) * u64::from(size.height);
        if let Some(report) = self.meter.tick(elapsed, pixels) {
            info!("Speed: {:.1} M samples/s", report.msamples_per_sec);
            window.set_title(&format!(
                "{TITLE} ({:.1} M samples/s)",
                report.msamples_per_sec
            ));
        }

        renderer.draw(&FrameUniforms {
            mvp: camera::benchmark_projection(),
            time: elapsed.as_secs_f32(),
            clear: false,
        });

        match self.schedule.poll(elapsed) {
            Step::Stay => Ok(Flow::Continue),
            Step::Advance { finished, next } => {
                let figure = self.meter.current();
                info!("{finished}: {figure:.1} Msamples/s");
                self.with_log(|log, _| log.end_stage(figure))?;
                self.start_stage(renderer, next)?;
                Ok(Flow::Continue)
            }
            Step::Finish { finished } => {
                let figure = self.meter.current();
                info!("{finished}: {figure:.1} Msamples/s");
                self.with_log(|log, _| log.end_stage(figure))?;
                Ok(Flow::Exit)
            }
        }
    }

    fn finish(&mut self) -> Result<()> {
        if !self.schedule.is_done() {
            info!("Benchmark interrupted after {:.1} s", self.elapsed().as_secs_f64());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn bench(extra: &[&str]) -> NoiseBench {
        let mut args = vec!["noisebench", "--shader-dir", "assets"];
        args.extend_from_slice(extra);
        NoiseBench::new(BenchArgs::try_parse_from(args).unwrap())
    }

    #[test]
    fn stage_shaders_come_from_the_shader_dir() {
        let bench = bench(&[]);
        let pair = bench.shaders(Stage::new(3));
        assert_eq!(pair.vertex, PathBuf::from("assets").join("simplex.vert"));
        assert_eq!(pair.fragment, PathBuf::from("assets").join("simplex3d.frag"));
    }

    #[test]
    fn swap_interval_follows_vsync_flag() {
        assert_eq!(bench(&[]).swap_interval(), SwapInterval::DontWait);
        assert!(matches!(
            bench(&["--vsync"]).swap_interval(),
            SwapInterval::Wait(_)
        ));
    }

    #[test]
    fn writing_without_a_log_is_a_no_op() {
        let mut bench = bench(&[]);
        bench.with_log(|log, _| log.end_stage(1.0)).unwrap();
        assert_eq!(bench.elapsed(), Duration::ZERO);
    }

    #[test]
    fn desktop_size_falls_back_to_the_window_monitor() {
        assert_eq!(desktop_or((1920, 1080), || Some((800, 600))), (1920, 1080));
        assert_eq!(desktop_or((0, 0), || Some((2560, 1440))), (2560, 1440));
        assert_eq!(desktop_or((0, 0), || None), (0, 0));
    }
}
