use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::renderer::GlInfo;
use crate::schedule::Stage;

/// Plain-text benchmark log: driver strings, then one line per stage.
pub struct BenchLog<W: Write> {
    out: W,
    stages_started: usize,
}

impl BenchLog<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| Error::Log {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> BenchLog<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            stages_started: 0,
        }
    }

    pub fn header(&mut self, info: &GlInfo, desktop: (u32, u32)) -> io::Result<()> {
        writeln!(self.out, "GL vendor:    {}", info.vendor)?;
        writeln!(self.out, "GL renderer:  {}", info.renderer)?;
        writeln!(self.out, "GL version:   {}", info.version)?;
        writeln!(self.out, "Desktop size: {} x {} pixels", desktop.0, desktop.1)?;
        self.out.flush()
    }

    /// Opens a stage line; its figure is appended by [`BenchLog::end_stage`].
    pub fn begin_stage(&mut self, stage: Stage, version: &str) -> io::Result<()> {
        if self.stages_started == 0 {
            writeln!(self.out)?;
        }
        self.stages_started += 1;
        write!(self.out, "{stage}, version {version}, ")?;
        self.out.flush()
    }

    pub fn end_stage(&mut self, msamples_per_sec: f64) -> io::Result<()> {
        writeln!(self.out, "{msamples_per_sec:.1} Msamples/s")?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
