//! Harness for benchmarking and showing GLSL procedural-noise shaders.
//!
//! The noise itself lives in external shader files; this crate opens the window,
//! builds the shader programs, draws a quad or a sphere with them and reports how
//! fast the fragment stage runs.

pub mod app;
pub mod bench;
pub mod camera;
pub mod config;
pub mod context;
pub mod demo;
pub mod error;
pub mod geometry;
pub mod meter;
pub mod renderer;
pub mod report;
pub mod schedule;
pub mod shaders;

pub use error::{Error, Result};

pub mod gl {
    #![allow(clippy::all)]
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));

    pub use Gles2 as Gl;
}

/// Sets up `env_logger` with `info` as the default level.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
