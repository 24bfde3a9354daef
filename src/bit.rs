use std::{
    fmt::{self, Binary, Debug, Display},
    io,
    ops::{BitAnd, BitOr, Not},
};

use crate::{
    signal::SignalValue,
    trace::{IdCode, TraceVars, Traceable, Tracer},
};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Bit(bool);

pub const H: Bit = Bit(true);
pub const L: Bit = Bit(false);

impl SignalValue for Bit {}

impl SignalValue for bool {}

impl Bit {
    pub const fn is_high(self) -> bool {
        self.0
    }
}

impl From<bool> for Bit {
    fn from(value: bool) -> Bit {
        Bit(value)
    }
}

impl From<Bit> for bool {
    fn from(bit: Bit) -> Self {
        bit.0
    }
}

impl Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self.0 {
            true => "H",
            false => "L",
        })
    }
}

impl Debug for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Binary for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 as u8)
    }
}

impl Not for Bit {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::from(!self.0)
    }
}

impl BitAnd for Bit {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from(self.0 && rhs.0)
    }
}

impl BitOr for Bit {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from(self.0 || rhs.0)
    }
}

impl Traceable for Bit {
    fn add_vars(vars: &mut TraceVars) {
        vars.wire(1);
    }

    fn trace(&self, id: &mut IdCode, tracer: &mut Tracer) -> io::Result<()> {
        tracer.change_bit(id, self.0)
    }
}
