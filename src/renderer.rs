use std::ffi::{CStr, CString};
use std::mem;

use cgmath::Matrix4;
use glutin::display::GlDisplay;
use log::{info, warn};

use crate::error::{Error, Result};
use crate::geometry::{Mesh, Vertex};
use crate::gl;
use crate::gl::types::{GLenum, GLsizei, GLsizeiptr, GLuint};
use crate::shaders::{
    ShaderProgram, ShaderSources, NORMAL_LOCATION, POSITION_LOCATION, TEXCOORD_LOCATION,
};

/// Driver identification strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlInfo {
    pub vendor: String,
    pub renderer: String,
    pub version: String,
    pub shading_language_version: String,
}

/// Per-frame inputs.
#[derive(Debug, Clone, Copy)]
pub struct FrameUniforms {
    pub mvp: Matrix4<f32>,
    pub time: f32,
    pub clear: bool,
}

fn gldbg(s: &str, gl: &gl::Gl) {
    unsafe {
        let err = gl.GetError();
        if err != gl::NO_ERROR {
            warn!("{s} GL error: {err:#06x}");
        }
    }
}

pub struct Renderer {
    program: Option<ShaderProgram>,
    vao: GLuint,
    vbo: GLuint,
    ebo: GLuint,
    index_count: GLsizei,
    gl: gl::Gl,
    info: GlInfo,
}

impl Renderer {
    /// Loads GL entry points from the current context and uploads `mesh`.
    pub fn new<D: GlDisplay>(gl_display: &D, mesh: &Mesh) -> Result<Self> {
        let gl = gl::Gl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        });

        let info = query_info(&gl)?;
        info!("Running on {} ({})", info.renderer, info.vendor);
        info!("OpenGL Version {}", info.version);
        info!("Shaders version {}", info.shading_language_version);

        unsafe {
            let mut vao = 0;
            gl.GenVertexArrays(1, &mut vao);
            gl.BindVertexArray(vao);

            let mut buffers = [0; 2];
            gl.GenBuffers(2, buffers.as_mut_ptr());
            let [vbo, ebo] = buffers;

            let vertex_bytes = mesh.vertex_bytes();
            gl.BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl.BufferData(
                gl::ARRAY_BUFFER,
                vertex_bytes.len() as GLsizeiptr,
                vertex_bytes.as_ptr().cast(),
                gl::STATIC_DRAW,
            );

            let index_bytes = mesh.index_bytes();
            gl.BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
            gl.BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                index_bytes.len() as GLsizeiptr,
                index_bytes.as_ptr().cast(),
                gl::STATIC_DRAW,
            );

            let stride = mem::size_of::<Vertex>() as GLsizei;
            let attributes = [
                (POSITION_LOCATION, 3, mem::offset_of!(Vertex, position)),
                (NORMAL_LOCATION, 3, mem::offset_of!(Vertex, normal)),
                (TEXCOORD_LOCATION, 2, mem::offset_of!(Vertex, texcoord)),
            ];
            for (location, size, offset) in attributes {
                gl.VertexAttribPointer(
                    location,
                    size,
                    gl::FLOAT,
                    gl::FALSE,
                    stride,
                    offset as *const _,
                );
                gl.EnableVertexAttribArray(location);
            }
            gldbg("VertexAttribPointer", &gl);

            Ok(Self {
                program: None,
                vao,
                vbo,
                ebo,
                index_count: mesh.indices.len() as GLsizei,
                gl,
                info,
            })
        }
    }

    pub fn info(&self) -> &GlInfo {
        &self.info
    }

    /// Builds a program from `sources` and makes it current. The running program
    /// is only replaced once the new one linked.
    pub fn load_program(&mut self, sources: &ShaderSources) -> Result<()> {
        let program = ShaderProgram::build(&self.gl, sources)?;
        if let Some(old) = self.program.replace(program) {
            old.delete(&self.gl);
        }
        gldbg("LinkProgram", &self.gl);
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = crate::camera::viewport(width, height);
        unsafe {
            self.gl.Viewport(0, 0, width as i32, height as i32);
        }
    }

    pub fn set_depth_test(&mut self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.Enable(gl::DEPTH_TEST);
            } else {
                self.gl.Disable(gl::DEPTH_TEST);
            }
        }
    }

    pub fn draw(&self, frame: &FrameUniforms) {
        let Some(program) = &self.program else {
            return;
        };
        unsafe {
            if frame.clear {
                self.gl.ClearColor(0.0, 0.0, 0.0, 1.0);
                self.gl.Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
            }

            self.gl.UseProgram(program.id());
            if let Some(loc) = program.time_location() {
                // The scalar upload is broken on some drivers, the vector form is not.
                self.gl.Uniform1fv(loc, 1, &frame.time);
            }
            if let Some(loc) = program.mvp_location() {
                let mvp: &[f32; 16] = frame.mvp.as_ref();
                self.gl.UniformMatrix4fv(loc, 1, gl::FALSE, mvp.as_ptr());
            }

            self.gl.BindVertexArray(self.vao);
            self.gl.DrawElements(
                gl::TRIANGLES,
                self.index_count,
                gl::UNSIGNED_SHORT,
                std::ptr::null(),
            );
            self.gl.UseProgram(0);
        }
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        if let Some(program) = self.program.take() {
            program.delete(&self.gl);
        }
        unsafe {
            self.gl.DeleteBuffers(1, &self.vbo);
            self.gl.DeleteBuffers(1, &self.ebo);
            self.gl.DeleteVertexArrays(1, &self.vao);
        }
    }
}

fn query_info(gl: &gl::Gl) -> Result<GlInfo> {
    let string = |variant| get_gl_string(gl, variant).map(|s| s.to_string_lossy().into_owned());
    let shading_language_version = string(gl::SHADING_LANGUAGE_VERSION)
        .ok_or(Error::Unsupported("no OpenGL shading language support"))?;
    Ok(GlInfo {
        vendor: string(gl::VENDOR).unwrap_or_default(),
        renderer: string(gl::RENDERER).unwrap_or_default(),
        version: string(gl::VERSION).unwrap_or_default(),
        shading_language_version,
    })
}

fn get_gl_string(gl: &gl::Gl, variant: GLenum) -> Option<&'static CStr> {
    unsafe {
        let s = gl.GetString(variant);
        (!s.is_null()).then(|| CStr::from_ptr(s.cast()))
    }
}
