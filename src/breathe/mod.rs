//! Breathing LED: a slow triangular ramp compared against a fast free-running
//! counter.
//!
//! All registers share one clock and have no reset. The ramp generator and
//! the counter update independently on every rising edge; the LED output is a
//! combinational function of their current values.

mod counter;
mod pwm;
mod ramp;

use std::io;

pub use counter::{free_running_counter, subcount_next, SubCount, SUBCOUNT_WIDTH};
pub use pwm::{pwm, top4, DutyWindow};
pub use ramp::{
    ramp_generator, ramp_next, ramp_period, Ramp, RampState, Step, RAMP_TURN_DOWN,
    RAMP_TURN_UP, RAMP_WIDTH,
};
use serde::{Deserialize, Serialize};

use crate::{
    bit::Bit,
    bundle::Bundle,
    domain::{Clock, ClockDomain, IceStick, SECOND},
    signal::{Signal, SignalValue},
    trace::{IdCode, TraceVars, Traceable, Tracer},
};

/// Register contents at power-up.
///
/// The hardware leaves them undefined; the default is all zeros, which puts
/// the ramp generator in its bootstrap state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PowerUp {
    pub ramp: Ramp,
    pub delta: Step,
    pub subcount: SubCount,
}

impl PowerUp {
    pub fn ramp_state(&self) -> RampState {
        RampState::new(self.ramp, self.delta)
    }
}

/// Everything observable at one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breathe {
    pub ramp: Ramp,
    pub delta: Step,
    pub subcount: SubCount,
    pub led: Bit,
}

impl SignalValue for Breathe {}

impl Breathe {
    pub fn level(&self) -> SubCount {
        top4(self.ramp)
    }
}

impl Traceable for Breathe {
    fn add_vars(vars: &mut TraceVars) {
        vars.field::<Ramp>("ramp");
        vars.field::<Step>("delta");
        vars.field::<SubCount>("subcount");
        vars.field::<Bit>("led");
    }

    fn trace(&self, id: &mut IdCode, tracer: &mut Tracer) -> io::Result<()> {
        self.ramp.trace(id, tracer)?;
        self.delta.trace(id, tracer)?;
        self.subcount.trace(id, tracer)?;
        self.led.trace(id, tracer)?;

        Ok(())
    }
}

pub fn breathe<D: ClockDomain>(clk: &Clock<D>, power_up: &PowerUp) -> Signal<D, Breathe> {
    let ramp = ramp_generator(clk, power_up.ramp_state());
    let subcount = free_running_counter(clk, power_up.subcount);

    (ramp, subcount)
        .bundle()
        .map(|(RampState { ramp, delta }, subcount)| Breathe {
            ramp,
            delta,
            subcount,
            led: pwm(ramp, subcount),
        })
}

/// LED pin of the design as it runs on the board, starting from zeroed registers.
pub fn top_module(clk: &Clock<IceStick>) -> Signal<IceStick, Bit> {
    breathe(clk, &PowerUp::default()).map(|breathe| breathe.led)
}

/// Duration of one full fade in and out, in seconds.
pub fn breathe_period_secs<D: ClockDomain>() -> f64 {
    ramp_period() as f64 * D::PERIOD as f64 / SECOND as f64
}
