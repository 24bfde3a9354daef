use std::io::{self, Write};

use breathe_hdl::{
    breathe::{
        breathe_period_secs, ramp_period, DutyWindow, RAMP_TURN_DOWN, RAMP_TURN_UP,
        RAMP_WIDTH, SUBCOUNT_WIDTH,
    },
    domain::{ClockDomain, IceStick},
};
use clap::Args;

use super::Run;

#[derive(Debug, Args)]
pub struct InfoArgs {}

impl Run for InfoArgs {
    fn run(&self) -> anyhow::Result<()> {
        write_info::<IceStick>(&mut io::stdout().lock())?;

        Ok(())
    }
}

fn write_info<D: ClockDomain>(out: &mut impl Write) -> io::Result<()> {
    let window = DutyWindow::LEN as u64;

    writeln!(out, "clock        {} {} Hz ({} ps)", D::NAME, D::FREQ, D::PERIOD)?;
    writeln!(
        out,
        "ramp         {RAMP_WIDTH} bits, turns up at {RAMP_TURN_UP}, down at {RAMP_TURN_DOWN}"
    )?;
    writeln!(
        out,
        "breathe      {} ticks ({:.3} s)",
        ramp_period(),
        breathe_period_secs::<D>()
    )?;
    writeln!(
        out,
        "pwm          {SUBCOUNT_WIDTH} bit counter, {window} ticks ({} Hz)",
        D::FREQ / window
    )?;
    writeln!(out, "max duty     {}/{window}", window - 1)
}
