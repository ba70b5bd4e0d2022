use std::error::Error;

use clap::Parser;
use noisebench::config::DemoArgs;
use noisebench::demo::NoiseDemo;

fn main() -> Result<(), Box<dyn Error>> {
    let args = DemoArgs::parse();
    noisebench::init_logging();
    noisebench::app::run(NoiseDemo::new(args))?;
    Ok(())
}
