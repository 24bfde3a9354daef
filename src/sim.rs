use tracing::{debug, info};

use crate::{
    breathe::{breathe, Breathe, PowerUp},
    domain::{Clock, ClockDomain},
    error::Result,
    eval::{Eval, EvalIter},
    signal::Signal,
    trace::{TraceVars, Tracer},
};

pub const TRACE_MODULE: &str = "breathe";

/// Runs the breathing LED design tick by tick, optionally dumping every clock
/// edge into a VCD trace.
pub struct Simulation<D: ClockDomain> {
    clk: Clock<D>,
    iter: EvalIter<D, Signal<D, Breathe>>,
    tracer: Option<Tracer>,
    tick: u64,
}

impl<D: ClockDomain> Simulation<D> {
    pub fn new(power_up: &PowerUp) -> Self {
        debug!(?power_up, "power-up state");

        let clk = Clock::new();
        let iter = breathe(&clk, power_up).eval(&clk);

        Self {
            clk,
            iter,
            tracer: None,
            tick: 0,
        }
    }

    pub fn trace_vars() -> TraceVars {
        TraceVars::default()
            .add_var::<Clock<D>>("clk")
            .add_var::<Breathe>("dut")
    }

    /// Ticks after this call are dumped into `tracer`.
    pub fn attach_tracer(&mut self, tracer: Tracer) {
        self.tracer = Some(tracer);
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advances one clock period, returns the state after the rising edge.
    pub fn step(&mut self) -> Result<Breathe> {
        let value = self.half_step()?;
        self.half_step()?;
        self.tick += 1;

        Ok(value)
    }

    pub fn run(&mut self, ticks: u64) -> Result<Vec<Breathe>> {
        (0 .. ticks).map(|_| self.step()).collect()
    }

    /// Advances `ticks` periods without keeping the samples.
    pub fn skip(&mut self, ticks: u64) -> Result<()> {
        if ticks > 0 {
            info!(ticks, "fast-forwarding");
        }
        for _ in 0 .. ticks {
            self.step()?;
        }

        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        if let Some(tracer) = self.tracer.as_mut() {
            tracer.flush()?;
        }
        debug!(ticks = self.tick, "simulation finished");

        Ok(())
    }

    fn half_step(&mut self) -> Result<Breathe> {
        let value = self.iter.half_step();
        if let Some(tracer) = self.tracer.as_mut() {
            tracer.dump_time(self.iter.timestamp())?;
            tracer.trace("clk", &self.clk)?;
            tracer.trace("dut", &value)?;
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs};

    use super::*;
    use crate::{
        bit::Bit,
        breathe::{DutyWindow, Step},
        cast::Cast,
        domain::TD16,
    };

    #[test]
    fn steps_match_signal_ticks() {
        let power_up = PowerUp {
            ramp: 1_u8.cast(),
            delta: Step::Up,
            subcount: 0_u8.cast(),
        };
        let mut sim = Simulation::<TD16>::new(&power_up);

        let first = sim.step().unwrap();
        let second = sim.step().unwrap();

        assert_eq!(first.ramp, 1);
        assert_eq!(second.ramp, 2);
        assert_eq!(second.subcount, 1);
        assert_eq!(second.led, Bit::from(false));
        assert_eq!(sim.tick(), 2);
    }

    #[test]
    fn skip_then_run() {
        let mut sim = Simulation::<TD16>::new(&PowerUp::default());
        sim.skip(100).unwrap();

        let values = sim.run(3).unwrap();
        assert_eq!(
            values.iter().map(|v| v.ramp.cast::<u32>()).collect::<Vec<_>>(),
            [100, 101, 102]
        );
        assert_eq!(sim.tick(), 103);
    }

    #[test]
    fn duty_tracks_ramp_level() {
        for level in 0 .. 16_u32 {
            let power_up = PowerUp {
                ramp: ((level << 19) + 1000).cast(),
                delta: Step::Up,
                subcount: 5_u8.cast(),
            };
            let mut sim = Simulation::<TD16>::new(&power_up);
            let mut window = DutyWindow::default();

            let duty = sim
                .run(16)
                .unwrap()
                .into_iter()
                .filter_map(|value| window.push(value.led))
                .last();
            assert_eq!(duty, Some(level as u8));
        }
    }

    #[test]
    fn writes_vcd() {
        let path = env::temp_dir().join(format!("breathe-sim-{}.vcd", std::process::id()));
        let tracer =
            Tracer::open_vcd(&path, Simulation::<TD16>::trace_vars(), TRACE_MODULE).unwrap();

        let mut sim = Simulation::<TD16>::new(&PowerUp::default());
        sim.attach_tracer(tracer);
        sim.run(4).unwrap();
        sim.finish().unwrap();

        let vcd = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(vcd.contains("$scope module breathe $end"));
        assert!(vcd.contains("clk $end"));
        assert!(vcd.contains("dut_ramp $end"));
        assert!(vcd.contains("dut_delta $end"));
        assert!(vcd.contains("dut_subcount $end"));
        assert!(vcd.contains("dut_led $end"));
        assert!(vcd.contains("#0"));
    }
}
