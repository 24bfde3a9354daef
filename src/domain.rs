use std::{cell::Cell, fmt, io, marker::PhantomData, rc::Rc};

use derive_where::derive_where;

use crate::trace::{IdCode, TraceVars, Traceable, Tracer};

pub const SECOND: u64 = 1_000_000_000_000;
pub const MILLISECOND: u64 = 1_000_000_000;
pub const MICROSECOND: u64 = 1_000_000;
pub const NANOSECOND: u64 = 1_000;
pub const PICOSECOND: u64 = 1;

pub const fn hz_to_period(freq: u64) -> u64 {
    assert!(freq > 0 && SECOND >= freq);
    SECOND / freq
}

pub trait ClockDomain: 'static {
    const NAME: &'static str;
    /// In hertz
    const FREQ: u64;
    /// In picoseconds
    const PERIOD: u64 = hz_to_period(Self::FREQ);
    /// Rising to falling edge, in picoseconds. Rounded down for odd periods;
    /// rising edges stay a whole `PERIOD` apart.
    const HALF_PERIOD: u64 = Self::PERIOD / 2;
}

/// Clock shared between the registers of a domain and the evaluator driving it.
///
/// The level is high for the evaluation step right after a rising edge. Clones
/// share the level, so toggling one clone moves all of them.
#[derive_where(Debug, Clone)]
pub struct Clock<D: ClockDomain> {
    high: Rc<Cell<bool>>,
    _dom: PhantomData<D>,
}

impl<D: ClockDomain> Default for Clock<D> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<D: ClockDomain> Clock<D> {
    /// Starts low so that the first toggle is a rising edge.
    pub fn new() -> Self {
        Self {
            high: Rc::new(Cell::new(false)),
            _dom: PhantomData,
        }
    }

    #[inline]
    pub fn is_rising(&self) -> bool {
        self.high.get()
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        !self.high.get()
    }

    pub fn toggle(&self) {
        self.high.set(!self.high.get());
    }
}

impl<D: ClockDomain> fmt::Display for Clock<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(if self.is_rising() { "rising" } else { "falling" })
    }
}

impl<D: ClockDomain> Traceable for Clock<D> {
    fn add_vars(vars: &mut TraceVars) {
        vars.wire(1);
    }

    fn trace(&self, id: &mut IdCode, tracer: &mut Tracer) -> io::Result<()> {
        tracer.change_bit(id, self.is_rising())
    }
}

/// 12 MHz oscillator of the iCEstick evaluation board.
pub struct IceStick;

impl ClockDomain for IceStick {
    const NAME: &'static str = "iCEstick";
    const FREQ: u64 = 12_000_000;
}

pub struct TestDomain<const N: u64>;

impl<const N: u64> ClockDomain for TestDomain<N> {
    const NAME: &'static str = "test";
    const FREQ: u64 = N;
}

pub type TD4 = TestDomain<4>;
pub type TD16 = TestDomain<16>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periods() {
        assert_eq!(TD4::PERIOD, 250 * MILLISECOND);
        assert_eq!(TD4::HALF_PERIOD, 125 * MILLISECOND);
        assert_eq!(IceStick::PERIOD, 83_333 * PICOSECOND);
        assert_eq!(hz_to_period(1_000_000), MICROSECOND);
        assert_eq!(hz_to_period(1_000_000_000), NANOSECOND);
    }

    #[test]
    fn shared_level() {
        let clk = Clock::<TD4>::new();
        let clone = clk.clone();

        assert!(clk.is_falling());
        clone.toggle();
        assert!(clk.is_rising());
        assert_eq!(clk.to_string(), "rising");
        clk.toggle();
        assert!(clone.is_falling());
    }
}
