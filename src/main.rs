//! CLI entry point for sample-driven tile grid generation

use clap::Parser;
use tilesynth::io::cli::{Cli, GenerationRunner};

fn main() -> tilesynth::Result<()> {
    let cli = Cli::parse();
    let mut runner = GenerationRunner::new(cli);
    runner.process().map(drop)
}
