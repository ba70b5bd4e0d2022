use std::error::Error;

use clap::Parser;
use noisebench::bench::NoiseBench;
use noisebench::config::BenchArgs;

fn main() -> Result<(), Box<dyn Error>> {
    let args = BenchArgs::parse();
    noisebench::init_logging();
    noisebench::app::run(NoiseBench::new(args))?;
    Ok(())
}
