use std::{
    io::{self, Write},
    path::PathBuf,
};

use breathe_hdl::verilog::{CLK_PORT, LED_PORT};
use clap::Args;

use super::{write_output, Run};

/// iCEstick package pin driven by the 12 MHz oscillator.
pub const CLK_PIN: u16 = 21;
/// iCEstick package pin of the center LED.
pub const LED_PIN: u16 = 99;

#[derive(Debug, Args)]
pub struct PcfArgs {
    /// Output file (stdout if not set)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Run for PcfArgs {
    fn run(&self) -> anyhow::Result<()> {
        write_output(self.output.as_deref(), "pin constraints", write_pcf)
    }
}

pub(super) fn write_pcf(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "set_io {CLK_PORT} {CLK_PIN}")?;
    writeln!(out, "set_io {LED_PORT} {LED_PIN}")
}
