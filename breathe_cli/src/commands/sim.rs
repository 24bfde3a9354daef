use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::Context;
use breathe_hdl::{
    bit::Bit,
    breathe::{Breathe, DutyWindow, PowerUp, Ramp, Step, SubCount},
    domain::IceStick,
    sim::{Simulation, TRACE_MODULE},
    trace::Tracer,
};
use clap::Args;
use tracing::info;

use super::Run;
use crate::config::{SimConfig, DEFAULT_TICKS};

#[derive(Debug, Args)]
pub struct SimArgs {
    /// Number of ticks to print
    #[arg(short, long)]
    ticks: Option<u64>,
    /// Number of ticks to run before printing
    #[arg(long)]
    skip: Option<u64>,
    /// JSON file with simulation settings
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Write the printed ticks as a VCD waveform
    #[arg(long)]
    vcd: Option<PathBuf>,
    /// Power-up value of the ramp register
    #[arg(long)]
    ramp: Option<u128>,
    /// Power-up value of the ramp direction (-1, 0 or 1)
    #[arg(long, allow_hyphen_values = true)]
    delta: Option<i8>,
    /// Power-up value of the PWM counter
    #[arg(long)]
    subcount: Option<u128>,
}

#[derive(Debug)]
struct Settings {
    ticks: u64,
    skip: u64,
    vcd: Option<PathBuf>,
    power_up: PowerUp,
}

impl SimArgs {
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };

        if let Some(ramp) = self.ramp {
            config.power_up.ramp = Ramp::try_new(ramp).context("invalid --ramp")?;
        }
        if let Some(delta) = self.delta {
            config.power_up.delta = Step::try_from(delta).context("invalid --delta")?;
        }
        if let Some(subcount) = self.subcount {
            config.power_up.subcount =
                SubCount::try_new(subcount).context("invalid --subcount")?;
        }

        Ok(Settings {
            ticks: self.ticks.or(config.ticks).unwrap_or(DEFAULT_TICKS),
            skip: self.skip.or(config.skip).unwrap_or_default(),
            vcd: self.vcd.clone().or(config.vcd),
            power_up: config.power_up,
        })
    }
}

impl Run for SimArgs {
    fn run(&self) -> anyhow::Result<()> {
        let settings = self.settings()?;
        info!(
            ticks = settings.ticks,
            skip = settings.skip,
            "simulating breathing LED"
        );

        let mut sim = Simulation::<IceStick>::new(&settings.power_up);
        sim.skip(settings.skip)?;

        if let Some(path) = &settings.vcd {
            let tracer =
                Tracer::open_vcd(path, Simulation::<IceStick>::trace_vars(), TRACE_MODULE)
            .with_context(|| format!("failed to create '{}'", path.display()))?;
            sim.attach_tracer(tracer);
        }

        let mut out = BufWriter::new(io::stdout().lock());
        write_header(&mut out)?;

        let mut duty = DutySummary::default();
        for _ in 0 .. settings.ticks {
            let tick = sim.tick();
            let sample = sim.step()?;
            write_row(&mut out, tick, &sample)?;
            duty.push(sample.led);
        }
        duty.write(&mut out)?;
        out.flush()?;
        sim.finish()?;

        if let Some(path) = &settings.vcd {
            info!("waveform written to '{}'", path.display());
        }

        Ok(())
    }
}

fn write_header(out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "{:>10} {:>8} {:>5} {:>8} {:>5} {:>3}",
        "tick", "ramp", "delta", "subcount", "level", "led"
    )
}

fn write_row(out: &mut impl Write, tick: u64, sample: &Breathe) -> io::Result<()> {
    writeln!(
        out,
        "{:>10} {:>8} {:>5} {:>8} {:>5} {:>3}",
        tick,
        sample.ramp,
        sample.delta,
        sample.subcount,
        sample.level(),
        sample.led
    )
}

/// Running duty cycle range over the printed ticks.
#[derive(Debug, Default)]
struct DutySummary {
    window: DutyWindow,
    windows: u64,
    range: Option<(u8, u8)>,
}

impl DutySummary {
    fn push(&mut self, led: Bit) {
        if let Some(high) = self.window.push(led) {
            self.windows += 1;
            self.range = Some(match self.range {
                Some((min, max)) => (min.min(high), max.max(high)),
                None => (high, high),
            });
        }
    }

    fn write(&self, out: &mut impl Write) -> io::Result<()> {
        match self.range {
            Some((min, max)) => writeln!(
                out,
                "duty over {} windows of {len} ticks: {min}/{len} .. {max}/{len}",
                self.windows,
                len = DutyWindow::LEN,
            ),
            None => writeln!(
                out,
                "fewer than {} ticks printed, no complete duty window",
                DutyWindow::LEN
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use breathe_hdl::cast::Cast;

    use super::*;

    fn sample(ramp: u32, delta: Step, subcount: u8, led: bool) -> Breathe {
        Breathe {
            ramp: ramp.cast(),
            delta,
            subcount: subcount.cast(),
            led: Bit::from(led),
        }
    }

    fn args() -> SimArgs {
        SimArgs {
            ticks: None,
            skip: None,
            config: None,
            vcd: None,
            ramp: None,
            delta: None,
            subcount: None,
        }
    }

    #[test]
    fn table() {
        let mut out = Vec::new();
        write_header(&mut out).unwrap();
        write_row(&mut out, 7, &sample(8388606, Step::Up, 3, true)).unwrap();
        write_row(&mut out, 8, &sample(8388607, Step::Down, 4, true)).unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1].split_whitespace().collect::<Vec<_>>(),
            ["7", "8388606", "+1", "3", "15", "H"]
        );
        assert_eq!(
            lines[2].split_whitespace().collect::<Vec<_>>(),
            ["8", "8388607", "-1", "4", "15", "H"]
        );
    }

    #[test]
    fn summary() {
        let mut duty = DutySummary::default();
        for tick in 0 .. 48_u8 {
            let level = if tick < 16 { 5 } else { 9 };
            duty.push(Bit::from(tick % 16 < level));
        }

        let mut out = Vec::new();
        duty.write(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "duty over 3 windows of 16 ticks: 5/16 .. 9/16\n"
        );
    }

    #[test]
    fn summary_without_full_window() {
        let mut duty = DutySummary::default();
        for _ in 0 .. 15 {
            duty.push(Bit::from(true));
        }

        let mut out = Vec::new();
        duty.write(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("fewer than 16"));
    }

    #[test]
    fn flags_override_defaults() {
        let settings = SimArgs {
            ramp: Some(1),
            delta: Some(-1),
            subcount: Some(9),
            ticks: Some(5),
            ..args()
        }
        .settings()
        .unwrap();

        assert_eq!(settings.ticks, 5);
        assert_eq!(settings.skip, 0);
        assert_eq!(settings.power_up.ramp, 1);
        assert_eq!(settings.power_up.delta, Step::Down);
        assert_eq!(settings.power_up.subcount, 9);
        assert!(settings.vcd.is_none());
    }

    #[test]
    fn defaults() {
        let settings = args().settings().unwrap();

        assert_eq!(settings.ticks, DEFAULT_TICKS);
        assert_eq!(settings.power_up, PowerUp::default());
    }

    #[test]
    fn rejects_bad_flags() {
        assert!(SimArgs {
            subcount: Some(16),
            ..args()
        }
        .settings()
        .is_err());
        assert!(SimArgs {
            delta: Some(2),
            ..args()
        }
        .settings()
        .is_err());
    }
}
