use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;

/// Noise version string written to the benchmark log.
pub const NOISE_VERSION: &str = "2011-03-25";
pub const BENCH_LOG_FILE: &str = "noisebench.log";
pub const DEMO_VERTEX_SHADER: &str = "noisedemo.vert";
pub const DEMO_FRAGMENT_SHADER: &str = "noisedemo.frag";

#[derive(Parser, Debug, Clone)]
#[command(name = "noisebench", version, about = "Fragment throughput benchmark for GLSL simplex noise")]
pub struct BenchArgs {
    /// Directory holding the shader files
    #[arg(long, default_value_os_t = default_asset_dir())]
    pub shader_dir: PathBuf,

    /// Benchmark log [default: noisebench.log in the shader directory]
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Seconds spent on each noise dimension
    #[arg(long = "stage-seconds", default_value = "5", value_parser = parse_seconds)]
    pub stage_duration: Duration,

    /// Run in a window instead of fullscreen
    #[arg(long)]
    pub windowed: bool,

    /// Window width when windowed
    #[arg(long, short = 'W', default_value_t = 1280)]
    pub width: u32,

    /// Window height when windowed
    #[arg(long, short = 'H', default_value_t = 720)]
    pub height: u32,

    /// Version label of the noise shaders under test
    #[arg(long, default_value = NOISE_VERSION)]
    pub noise_version: String,

    /// Wait for vertical sync between frames
    #[arg(long)]
    pub vsync: bool,
}

impl BenchArgs {
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.shader_dir.join(BENCH_LOG_FILE))
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "noisedemo", version, about = "Noise-shaded sphere")]
pub struct DemoArgs {
    /// Directory holding the shader files
    #[arg(long, default_value_os_t = default_asset_dir())]
    pub shader_dir: PathBuf,

    /// Vertex shader, relative to the shader directory
    #[arg(long, default_value = DEMO_VERTEX_SHADER)]
    pub vertex: PathBuf,

    /// Fragment shader, relative to the shader directory
    #[arg(long, default_value = DEMO_FRAGMENT_SHADER)]
    pub fragment: PathBuf,

    #[arg(long, short = 'W', default_value_t = 512)]
    pub width: u32,

    #[arg(long, short = 'H', default_value_t = 512)]
    pub height: u32,

    /// Render as fast as possible
    #[arg(long)]
    pub no_vsync: bool,
}

fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|err| format!("{err}"))?;
    match Duration::try_from_secs_f64(secs) {
        Ok(duration) if !duration.is_zero() => Ok(duration),
        Ok(_) => Err(format!("{s} is not a positive number of seconds")),
        Err(err) => Err(format!("{s} is not a usable number of seconds: {err}")),
    }
}

/// Where shaders and logs live by default: `shaders/` under the working directory,
/// or the folder containing the application bundle when running from inside one.
pub fn default_asset_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| bundle_root(&exe))
        .unwrap_or_else(|| PathBuf::from("shaders"))
}

/// For `<root>/Name.app/Contents/MacOS/exe` returns `<root>`.
pub fn bundle_root(exe: &Path) -> Option<PathBuf> {
    let macos = exe.parent()?;
    let contents = macos.parent()?;
    let bundle = contents.parent()?;
    let is_bundle = macos.file_name()? == "MacOS"
        && contents.file_name()? == "Contents"
        && bundle.extension()? == "app";
    if is_bundle {
        bundle.parent().map(Path::to_path_buf)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bench_defaults() {
        let args = BenchArgs::try_parse_from(["noisebench", "--shader-dir", "assets"]).unwrap();
        assert_eq!(args.stage_duration, Duration::from_secs(5));
        assert_eq!(args.noise_version, NOISE_VERSION);
        assert_eq!(args.log_path(), Path::new("assets").join(BENCH_LOG_FILE));
        assert!(!args.windowed);
        assert!(!args.vsync);
    }

    #[test]
    fn bench_overrides() {
        let args = BenchArgs::try_parse_from([
            "noisebench",
            "--stage-seconds",
            "0.5",
            "--log-file",
            "/tmp/run.log",
            "--windowed",
            "-W",
            "800",
            "-H",
            "600",
        ])
        .unwrap();
        assert_eq!(args.stage_duration, Duration::from_millis(500));
        assert_eq!(args.log_path(), PathBuf::from("/tmp/run.log"));
        assert!(args.windowed);
        assert_eq!((args.width, args.height), (800, 600));
    }

    #[test]
    fn stage_seconds_must_be_positive() {
        for bad in ["0", "-1", "-0.5", "nan", "inf", "1e30", "soon"] {
            assert!(
                BenchArgs::try_parse_from(["noisebench", "--stage-seconds", bad]).is_err(),
                "{bad} accepted"
            );
        }
    }

    #[test]
    fn huge_stage_seconds_are_a_parse_error() {
        let err = BenchArgs::try_parse_from(["noisebench", "--stage-seconds", "1e30"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn demo_defaults() {
        let args = DemoArgs::try_parse_from(["noisedemo"]).unwrap();
        assert_eq!((args.width, args.height), (512, 512));
        assert_eq!(args.vertex, PathBuf::from(DEMO_VERTEX_SHADER));
        assert_eq!(args.fragment, PathBuf::from(DEMO_FRAGMENT_SHADER));
        assert!(!args.no_vsync);
    }

    #[test]
    fn finds_the_bundle_root() {
        let exe = Path::new("/Applications/bench/Noise.app/Contents/MacOS/noisebench");
        assert_eq!(bundle_root(exe), Some(PathBuf::from("/Applications/bench")));
    }

    #[test]
    fn plain_executables_have_no_bundle_root() {
        assert_eq!(bundle_root(Path::new("/usr/local/bin/noisebench")), None);
        assert_eq!(bundle_root(Path::new("/opt/Noise/Contents/MacOS/noisebench")), None);
        assert_eq!(bundle_root(Path::new("noisebench")), None);
    }
}
