pub mod bit;
pub mod breathe;
pub mod bundle;
pub mod cast;
pub mod domain;
pub mod error;
pub mod eval;
pub mod signal;
mod signal_fn;
pub mod signed;
pub mod sim;
pub mod trace;
mod tuples;
pub mod unsigned;
pub mod verilog;

pub use error::{Error, Result};

pub mod prelude {
    pub use crate::{
        bit::{Bit, H, L},
        breathe::{breathe, Breathe, PowerUp, Ramp, RampState, Step, SubCount},
        bundle::Bundle,
        cast::{Cast, CastFrom},
        domain::{hz_to_period, Clock, ClockDomain, IceStick},
        eval::Eval,
        signal::{reg, Signal, SignalValue},
        signed::Signed,
        sim::Simulation,
        trace::{Traceable, Tracer},
        unsigned::{Unsigned, U},
    };
}
