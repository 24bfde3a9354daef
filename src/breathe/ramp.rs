use std::{
    fmt::{self, Display},
    io,
};

use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::{
    cast::CastFrom,
    domain::{Clock, ClockDomain},
    error::Error,
    signal::{reg, Signal, SignalValue},
    signed::Signed,
    trace::{IdCode, TraceVars, Traceable, Tracer},
    unsigned::Unsigned,
};

pub const RAMP_WIDTH: usize = 23;

pub type Ramp = Unsigned<RAMP_WIDTH>;

/// The ramp, read one bit wider as a signed value, turns downwards here:
/// one step below the top of the register's range.
pub const RAMP_TURN_DOWN: i128 = (1 << RAMP_WIDTH) - 2;

/// Ramp value at which the ramp turns upwards.
pub const RAMP_TURN_UP: u128 = 1;

/// Direction of the ramp. `Hold` only exists as a power-up state and is never
/// produced by [`ramp_next`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, Serialize, Deserialize,
)]
#[serde(try_from = "i8", into = "i8")]
#[repr(i8)]
pub enum Step {
    Down = -1,
    #[default]
    Hold = 0,
    Up = 1,
}

impl Step {
    pub fn to_signed(self) -> Signed<2> {
        Signed::from_bits(self as i8 as u128)
    }
}

impl SignalValue for Step {}

impl From<Step> for i8 {
    fn from(step: Step) -> Self {
        step as i8
    }
}

impl From<Step> for i128 {
    fn from(step: Step) -> Self {
        step as i8 as i128
    }
}

impl TryFrom<i8> for Step {
    type Error = Error;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Down),
            0 => Ok(Self::Hold),
            1 => Ok(Self::Up),
            _ => Err(Error::OutOfRange {
                kind: "Step",
                value: value as i128,
                width: 2,
            }),
        }
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Down => "-1",
            Self::Hold => "0",
            Self::Up => "+1",
        })
    }
}

impl Traceable for Step {
    fn add_vars(vars: &mut TraceVars) {
        Signed::<2>::add_vars(vars);
    }

    fn trace(&self, id: &mut IdCode, tracer: &mut Tracer) -> io::Result<()> {
        self.to_signed().trace(id, tracer)
    }
}

/// The `ramp` and `delta` registers of the ramp generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RampState {
    pub ramp: Ramp,
    pub delta: Step,
}

impl SignalValue for RampState {}

impl RampState {
    pub fn new(ramp: Ramp, delta: Step) -> Self {
        Self { ramp, delta }
    }

    /// Whether the state lies on the triangle the generator cycles through:
    /// rising from 0 up to the turning point or falling from the top down to 1.
    pub fn is_settled(&self) -> bool {
        let ramp = self.ramp.value() as i128;
        match self.delta {
            Step::Up => ramp <= RAMP_TURN_DOWN,
            Step::Down => ramp >= 1,
            Step::Hold => false,
        }
    }
}

/// Next state of the ramp generator.
///
/// The turning-point checks read the current registers and are applied in
/// order; the first one that matches wins. A `Hold` direction left over from
/// power-up restarts the ramp from 1 going up.
pub fn ramp_next(state: RampState) -> RampState {
    let RampState { ramp, delta } = state;
    let stepped = ramp.add_signed(delta.into());

    let next = if ramp == RAMP_TURN_UP {
        RampState::new(stepped, Step::Up)
    } else if Signed::<{ RAMP_WIDTH + 1 }>::cast_from(ramp) == RAMP_TURN_DOWN {
        RampState::new(stepped, Step::Down)
    } else if delta == Step::Hold {
        RampState::new(Ramp::cast_from(RAMP_TURN_UP), Step::Up)
    } else {
        RampState::new(stepped, delta)
    };

    debug_assert!(
        next.is_settled(),
        "ramp generator left its cycle: {state:?} -> {next:?}"
    );

    next
}

pub fn ramp_generator<D: ClockDomain>(
    clk: &Clock<D>,
    init: RampState,
) -> Signal<D, RampState> {
    reg(clk, &init, ramp_next)
}

/// Number of ticks in one full rise and fall of the ramp.
pub const fn ramp_period() -> u64 {
    2 * ((1 << RAMP_WIDTH) - 1)
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::cast::Cast;

    fn state(ramp: u32, delta: Step) -> RampState {
        RampState::new(ramp.cast(), delta)
    }

    #[test]
    fn free_runs_between_turns() {
        assert_eq!(ramp_next(state(2, Step::Up)), state(3, Step::Up));
        assert_eq!(ramp_next(state(1000, Step::Down)), state(999, Step::Down));
    }

    #[test]
    fn turns_up_at_one() {
        assert_eq!(ramp_next(state(1, Step::Up)), state(2, Step::Up));
        assert_eq!(ramp_next(state(1, Step::Down)), state(0, Step::Up));
        assert_eq!(ramp_next(state(0, Step::Up)), state(1, Step::Up));
    }

    #[test]
    fn turns_down_one_below_top() {
        assert_eq!(
            ramp_next(state(8388606, Step::Up)),
            state(8388607, Step::Down)
        );
        assert_eq!(
            ramp_next(state(8388607, Step::Down)),
            state(8388606, Step::Down)
        );
        assert_eq!(
            ramp_next(state(8388606, Step::Down)),
            state(8388605, Step::Down)
        );
    }

    #[test]
    fn bootstrap_from_hold() {
        for ramp in [0, 2, 12345, 4194304, 8388605, 8388607] {
            assert_eq!(ramp_next(state(ramp, Step::Hold)), state(1, Step::Up));
        }

        // the turning-point checks take priority over the bootstrap
        assert_eq!(ramp_next(state(1, Step::Hold)), state(1, Step::Up));
        assert_eq!(
            ramp_next(state(8388606, Step::Hold)),
            state(8388606, Step::Down)
        );
    }

    #[test]
    fn settles_after_one_tick_from_any_power_up() {
        let ramps = [0_u32, 1, 2, 3, 4194303, 8388605, 8388606, 8388607];
        for delta in Step::iter() {
            for ramp in ramps {
                let next = ramp_next(state(ramp, delta));
                assert!(next.is_settled(), "{ramp} {delta} -> {next:?}");
                assert_ne!(next.delta, Step::Hold);
            }
        }
    }

    #[test]
    fn triangle_is_periodic_and_symmetric() {
        let start = state(0, Step::Up);
        let half = ramp_period() / 2;

        let mut rising = Vec::with_capacity(half as usize);
        let mut current = start;
        for _ in 0 .. half {
            rising.push(current.ramp.value() as u32);
            current = ramp_next(current);
        }
        assert_eq!(current, state(8388607, Step::Down));

        for tick in 0 .. half as usize {
            let value = current.ramp.value() as u32;
            assert_eq!(value, 8388607 - rising[tick]);
            if tick > 0 {
                assert_eq!(value, rising[half as usize - tick]);
            }
            current = ramp_next(current);
        }
        assert_eq!(current, start);
    }

    #[test]
    fn step_conversions() {
        assert_eq!(i8::from(Step::Down), -1);
        assert_eq!(Step::try_from(1_i8).unwrap(), Step::Up);
        assert!(Step::try_from(2_i8).is_err());
        assert_eq!(Step::Down.to_signed(), -1);
        assert_eq!(Step::Up.to_string(), "+1");
        assert_eq!(Step::default(), Step::Hold);
    }
}
