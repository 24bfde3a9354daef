use std::path::PathBuf;

use breathe_hdl::verilog::write_verilog;
use clap::Args;

use super::{write_output, Run};

#[derive(Debug, Args)]
pub struct VerilogArgs {
    /// Output file (stdout if not set)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Run for VerilogArgs {
    fn run(&self) -> anyhow::Result<()> {
        write_output(self.output.as_deref(), "verilog", |out| write_verilog(out))
    }
}
