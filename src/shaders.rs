use std::ffi::CStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use const_cstr::const_cstr;
use log::debug;

use crate::error::{Error, Result};
use crate::gl;
use crate::gl::types::{GLenum, GLint, GLuint};

const_cstr! {
    ATTRIB_POSITION = "position";
    ATTRIB_NORMAL = "normal";
    ATTRIB_TEXCOORD = "texcoord";
    UNIFORM_TIME = "time";
    UNIFORM_MVP = "mvp";
}

// Fixed attribute slots shared by every program, so one vertex array serves all.
pub const POSITION_LOCATION: GLuint = 0;
pub const NORMAL_LOCATION: GLuint = 1;
pub const TEXCOORD_LOCATION: GLuint = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("Vertex"),
            ShaderStage::Fragment => f.write_str("Fragment"),
        }
    }
}

/// Paths of a vertex/fragment shader pair on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPair {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl ShaderPair {
    pub fn new(dir: &Path, vertex: impl AsRef<Path>, fragment: impl AsRef<Path>) -> Self {
        Self {
            vertex: dir.join(vertex),
            fragment: dir.join(fragment),
        }
    }

    pub fn load(&self) -> Result<ShaderSources> {
        Ok(ShaderSources {
            vertex: read_source(&self.vertex)?,
            fragment: read_source(&self.fragment)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

fn read_source(path: &Path) -> Result<String> {
    debug!("reading shader {}", path.display());
    fs::read_to_string(path).map_err(|source| Error::ReadShader {
        path: path.to_path_buf(),
        source,
    })
}

/// A linked program and the uniform slots the harness feeds.
#[derive(Debug)]
pub struct ShaderProgram {
    id: GLuint,
    time: GLint,
    mvp: GLint,
}

impl ShaderProgram {
    /// Compiles both stages and links them. Shader objects never outlive this call.
    pub fn build(gl: &gl::Gl, sources: &ShaderSources) -> Result<Self> {
        let vertex = compile(gl, ShaderStage::Vertex, &sources.vertex)?;
        let fragment = match compile(gl, ShaderStage::Fragment, &sources.fragment) {
            Ok(fragment) => fragment,
            Err(err) => {
                unsafe { gl.DeleteShader(vertex) };
                return Err(err);
            }
        };

        unsafe {
            let program = gl.CreateProgram();
            gl.AttachShader(program, vertex);
            gl.AttachShader(program, fragment);
            gl.BindAttribLocation(program, POSITION_LOCATION, ATTRIB_POSITION.as_ptr());
            gl.BindAttribLocation(program, NORMAL_LOCATION, ATTRIB_NORMAL.as_ptr());
            gl.BindAttribLocation(program, TEXCOORD_LOCATION, ATTRIB_TEXCOORD.as_ptr());
            gl.LinkProgram(program);

            gl.DetachShader(program, vertex);
            gl.DetachShader(program, fragment);
            gl.DeleteShader(vertex);
            gl.DeleteShader(fragment);

            let mut status = 0;
            gl.GetProgramiv(program, gl::LINK_STATUS, &mut status);
            if status != gl::TRUE as GLint {
                let log = program_log(gl, program);
                gl.DeleteProgram(program);
                return Err(Error::Link { log });
            }

            Ok(Self {
                id: program,
                time: uniform_location(gl, program, UNIFORM_TIME.as_cstr()),
                mvp: uniform_location(gl, program, UNIFORM_MVP.as_cstr()),
            })
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn time_location(&self) -> Option<GLint> {
        (self.time >= 0).then_some(self.time)
    }

    pub fn mvp_location(&self) -> Option<GLint> {
        (self.mvp >= 0).then_some(self.mvp)
    }

    pub fn delete(self, gl: &gl::Gl) {
        unsafe { gl.DeleteProgram(self.id) };
    }
}

/// GL takes sources with an explicit length, but drivers stop reading at a NUL.
fn check_source(stage: ShaderStage, source: &str) -> Result<()> {
    if source.as_bytes().contains(&0) {
        return Err(Error::NulInSource(stage));
    }
    Ok(())
}

fn compile(gl: &gl::Gl, stage: ShaderStage, source: &str) -> Result<GLuint> {
    check_source(stage, source)?;
    unsafe {
        let shader = gl.CreateShader(stage.gl_enum());
        let len = source.len() as GLint;
        gl.ShaderSource(shader, 1, [source.as_ptr().cast()].as_ptr(), &len);
        gl.CompileShader(shader);

        let mut status = 0;
        gl.GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);
        if status != gl::TRUE as GLint {
            let log = shader_log(gl, shader);
            gl.DeleteShader(shader);
            return Err(Error::Compile { stage, log });
        }
        debug!("{stage} shader compiled");
        Ok(shader)
    }
}

unsafe fn shader_log(gl: &gl::Gl, shader: GLuint) -> String {
    let mut log_len: GLint = 0;
    gl.GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut log_len);
    let mut log_data = vec![0u8; log_len.max(1) as usize];
    let mut written = 0;
    gl.GetShaderInfoLog(
        shader,
        log_data.len() as GLint,
        &mut written,
        log_data.as_mut_ptr().cast(),
    );
    info_log(log_data)
}

unsafe fn program_log(gl: &gl::Gl, program: GLuint) -> String {
    let mut log_len: GLint = 0;
    gl.GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut log_len);
    let mut log_data = vec![0u8; log_len.max(1) as usize];
    let mut written = 0;
    gl.GetProgramInfoLog(
        program,
        log_data.len() as GLint,
        &mut written,
        log_data.as_mut_ptr().cast(),
    );
    info_log(log_data)
}

unsafe fn uniform_location(gl: &gl::Gl, program: GLuint, name: &CStr) -> GLint {
    let loc = gl.GetUniformLocation(program, name.as_ptr());
    if loc < 0 {
        debug!("program {program} has no uniform {name:?}");
    }
    loc
}

/// Turns a raw driver info log into text: stops at the first NUL and trims.
pub fn info_log(mut raw: Vec<u8>) -> String {
    if let Some(end) = raw.iter().position(|&b| b == 0) {
        raw.truncate(end);
    }
    String::from_utf8_lossy(&raw).trim_end().to_string()
}
