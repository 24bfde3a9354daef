use super::{
    counter::{SubCount, SUBCOUNT_WIDTH},
    ramp::{Ramp, RAMP_WIDTH},
};
use crate::{bit::Bit, cast::Cast};

/// Top `SUBCOUNT_WIDTH` bits of the ramp: the brightness level.
#[inline]
pub fn top4(ramp: Ramp) -> SubCount {
    (ramp >> (RAMP_WIDTH - SUBCOUNT_WIDTH)).cast()
}

/// LED drive: high while the fast counter is below the brightness level.
#[inline]
pub fn pwm(ramp: Ramp, subcount: SubCount) -> Bit {
    Bit::from(subcount < top4(ramp))
}

/// Counts high ticks over consecutive windows of one full counter sweep.
#[derive(Debug, Clone, Copy, Default)]
pub struct DutyWindow {
    high: u8,
    len: u8,
}

impl DutyWindow {
    pub const LEN: u8 = 1 << SUBCOUNT_WIDTH;

    /// Records one tick, returns the number of high ticks once a window is full.
    pub fn push(&mut self, led: Bit) -> Option<u8> {
        self.high += led.is_high() as u8;
        self.len += 1;
        if self.len == Self::LEN {
            let high = self.high;
            *self = Self::default();
            Some(high)
        } else {
            None
        }
    }
}
