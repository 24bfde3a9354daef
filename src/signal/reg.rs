use super::{Signal, SignalValue};
use crate::domain::{Clock, ClockDomain};

/// D flip-flop without reset or enable.
///
/// Holds `init` from power-up; on every rising edge of `clk` it latches
/// `comb_fn` applied to the value it held before the edge.
#[inline]
pub fn reg<D: ClockDomain, T: SignalValue>(
    clk: &Clock<D>,
    init: &T,
    comb_fn: impl Fn(T) -> T + 'static,
) -> Signal<D, T> {
    let clk = clk.clone();
    let mut was_high = clk.is_rising();
    let mut val = init.clone();
    let mut next_val = init.clone();

    Signal::new(move |_| {
        let high = clk.is_rising();
        if high && !was_high {
            val = next_val.clone();
        }
        was_high = high;
        next_val = (comb_fn)(val.clone());
        val.clone()
    })
}
