use crate::{
    domain::{Clock, ClockDomain},
    signal::{reg, Signal},
    unsigned::Unsigned,
};

pub const SUBCOUNT_WIDTH: usize = 4;

pub type SubCount = Unsigned<SUBCOUNT_WIDTH>;

#[inline]
pub fn subcount_next(subcount: SubCount) -> SubCount {
    subcount + 1
}

pub fn free_running_counter<D: ClockDomain>(
    clk: &Clock<D>,
    init: SubCount,
) -> Signal<D, SubCount> {
    reg(clk, &init, subcount_next)
}
