use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use clap::Subcommand;

use self::{info::InfoArgs, pcf::PcfArgs, sim::SimArgs, verilog::VerilogArgs};

mod info;
mod pcf;
mod sim;
mod verilog;

#[derive(Subcommand)]
pub enum Commands {
    /// Simulate the design and print a waveform table
    Sim(SimArgs),
    /// Print the design constants and board timing
    Info(InfoArgs),
    /// Write the Verilog module of the design
    Verilog(VerilogArgs),
    /// Write the pin constraints for the iCEstick board
    Pcf(PcfArgs),
}

pub trait Run {
    fn run(&self) -> anyhow::Result<()>;
}

impl Commands {
    pub fn run(&self) -> anyhow::Result<()> {
        match self {
            Self::Sim(args) => args.run(),
            Self::Info(args) => args.run(),
            Self::Verilog(args) => args.run(),
            Self::Pcf(args) => args.run(),
        }
    }
}

/// Renders into `output`, or to stdout when no file is given.
fn write_output(
    output: Option<&Path>,
    what: &str,
    render: impl FnOnce(&mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create '{}'", path.display()))?;
            let mut out = BufWriter::new(file);
            render(&mut out)?;
            out.flush()?;
            tracing::info!("{what} written to '{}'", path.display());
        }
        None => {
            let mut out = io::stdout().lock();
            render(&mut out)?;
            out.flush()?;
        }
    }

    Ok(())
}
