use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::shaders::ShaderStage;

#[derive(Debug)]
pub enum Error {
    ReadShader { path: PathBuf, source: io::Error },
    NulInSource(ShaderStage),
    Compile { stage: ShaderStage, log: String },
    Link { log: String },
    Log { path: PathBuf, source: io::Error },
    Io(io::Error),
    Unsupported(&'static str),
    Gl(glutin::error::Error),
    EventLoop(winit::error::EventLoopError),
    Window(winit::error::OsError),
    Display(String),
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ReadShader { path, source } => {
                write!(f, "Cannot open shader file {}: {}", path.display(), source)
            }
            Error::NulInSource(stage) => write!(f, "{stage} shader source contains a NUL byte"),
            Error::Compile { stage, log } => write!(f, "{stage} shader compile error: {log}"),
            Error::Link { log } => write!(f, "Program object linking error: {log}"),
            Error::Log { path, source } => {
                write!(f, "Cannot write log file {}: {}", path.display(), source)
            }
            Error::Io(err) => write!(f, "{err}"),
            Error::Unsupported(what) => write!(f, "GL init error: {what}"),
            Error::Gl(err) => write!(f, "GL context error: {err}"),
            Error::EventLoop(err) => write!(f, "event loop error: {err}"),
            Error::Window(err) => write!(f, "window error: {err}"),
            Error::Display(msg) => write!(f, "display error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ReadShader { source, .. } | Error::Log { source, .. } => Some(source),
            Error::Io(err) => Some(err),
            Error::Gl(err) => Some(err),
            Error::EventLoop(err) => Some(err),
            Error::Window(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<glutin::error::Error> for Error {
    fn from(err: glutin::error::Error) -> Self {
        Error::Gl(err)
    }
}

impl From<winit::error::EventLoopError> for Error {
    fn from(err: winit::error::EventLoopError) -> Self {
        Error::EventLoop(err)
    }
}

impl From<winit::error::OsError> for Error {
    fn from(err: winit::error::OsError) -> Self {
        Error::Window(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_errors_name_the_stage() {
        let err = Error::Compile {
            stage: ShaderStage::Fragment,
            log: "0:12(3): error: syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Fragment shader compile error: 0:12(3): error: syntax error"
        );
    }

    #[test]
    fn link_errors_keep_the_driver_log() {
        let err = Error::Link {
            log: "unresolved symbol snoise".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Program object linking error: unresolved symbol snoise"
        );
    }

    #[test]
    fn read_errors_expose_their_source() {
        use std::error::Error as _;

        let err = Error::ReadShader {
            path: PathBuf::from("missing.frag"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("missing.frag"));
        assert!(err.source().is_some());
    }
}
