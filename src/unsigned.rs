use std::{
    cmp::Ordering,
    fmt::{self, Binary, Display},
    io,
    ops::{Add, Shr, Sub},
};

use paste::paste;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    cast::{Cast, CastFrom},
    error::{Error, Result},
    signal::SignalValue,
    trace::{IdCode, TraceVars, Traceable, Tracer},
};

/// Mask selecting the lowest `width` bits.
pub const fn unsigned_mask(width: usize) -> u128 {
    if width >= 128 {
        u128::MAX
    } else {
        (1 << width) - 1
    }
}

pub const fn unsigned_value(val: u128, width: usize) -> u128 {
    val & unsigned_mask(width)
}

/// Fixed-width unsigned value. Every operation truncates its result to `N` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Unsigned<const N: usize>(u128);

impl<const N: usize> Unsigned<N> {
    pub const WIDTH: usize = N;
    pub const MAX: Self = Self(unsigned_mask(N));
    pub const ZERO: Self = Self(0);

    #[inline]
    pub const fn from_masked(val: u128) -> Self {
        Self(unsigned_value(val, N))
    }

    pub fn try_new(val: u128) -> Result<Self> {
        if val > unsigned_mask(N) {
            return Err(Error::OutOfRange {
                kind: "Unsigned",
                value: i128::try_from(val).unwrap_or(i128::MAX),
                width: N,
            });
        }

        Ok(Self(val))
    }

    #[inline]
    pub const fn value(self) -> u128 {
        self.0
    }

    /// Adds a signed step, wrapping around the `N`-bit range.
    pub fn add_signed(self, rhs: i128) -> Self {
        Self::from_masked((self.0 as i128).wrapping_add(rhs) as u128)
    }
}

impl<const N: usize> SignalValue for Unsigned<N> {}

impl<const N: usize> TryFrom<u128> for Unsigned<N> {
    type Error = Error;

    fn try_from(val: u128) -> Result<Self> {
        Self::try_new(val)
    }
}

impl<const N: usize> From<Unsigned<N>> for u128 {
    fn from(val: Unsigned<N>) -> Self {
        val.0
    }
}

impl<const N: usize> Serialize for Unsigned<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u128(self.0)
    }
}

impl<'de, const N: usize> Deserialize<'de> for Unsigned<N> {
    fn deserialize<De: Deserializer<'de>>(
        deserializer: De,
    ) -> std::result::Result<Self, De::Error> {
        let value = u128::deserialize(deserializer)?;
        Self::try_new(value).map_err(de::Error::custom)
    }
}

macro_rules! impl_for_unsigned_prim_ty {
    ($( $prim:ty ),+) => {
        $(
            impl SignalValue for $prim {}

            impl<const N: usize> CastFrom<$prim> for Unsigned<N> {
                #[inline]
                fn cast_from(val: $prim) -> Self {
                    Self::from_masked(val as u128)
                }
            }

            impl<const N: usize> CastFrom<Unsigned<N>> for $prim {
                #[inline]
                fn cast_from(val: Unsigned<N>) -> Self {
                    val.0 as $prim
                }
            }
        )+
    };
}

impl_for_unsigned_prim_ty!(u8, u16, u32, u64, u128, usize);

impl<const N: usize, const M: usize> CastFrom<Unsigned<M>> for Unsigned<N> {
    #[inline]
    fn cast_from(from: Unsigned<M>) -> Unsigned<N> {
        Self::from_masked(from.0)
    }
}

impl<const N: usize> PartialEq<u128> for Unsigned<N> {
    #[inline]
    fn eq(&self, other: &u128) -> bool {
        self.0 == *other
    }
}

impl<const N: usize> PartialEq<Unsigned<N>> for u128 {
    #[inline]
    fn eq(&self, other: &Unsigned<N>) -> bool {
        other.eq(self)
    }
}

impl<const N: usize> PartialOrd<u128> for Unsigned<N> {
    #[inline]
    fn partial_cmp(&self, other: &u128) -> Option<Ordering> {
        self.0.partial_cmp(other)
    }
}

impl<const N: usize> Display for Unsigned<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<const N: usize> Binary for Unsigned<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.0, width = N)
    }
}

macro_rules! impl_ops {
    ($( $trait:ident => $method:ident => $op:ident ),+) => {
        paste! {
            $(
                impl<const N: usize> $trait for Unsigned<N> {
                    type Output = Self;

                    #[inline]
                    fn $method(self, rhs: Self) -> Self::Output {
                        Self::from_masked(self.0.$op(rhs.0))
                    }
                }

                impl<const N: usize> $trait<usize> for Unsigned<N> {
                    type Output = Self;

                    #[inline]
                    fn $method(self, rhs: usize) -> Self::Output {
                        self.$method(rhs.cast::<Self>())
                    }
                }

                impl<const N: usize> std::ops::[<$trait Assign>] for Unsigned<N> {
                    #[inline]
                    fn [<$method _assign>](&mut self, rhs: Self) {
                        *self = self.$method(rhs);
                    }
                }
            )+
        }
    };
}

impl_ops!(
    Add => add => wrapping_add,
    Sub => sub => wrapping_sub
);

impl<const N: usize> Shr<usize> for Unsigned<N> {
    type Output = Self;

    fn shr(self, rhs: usize) -> Self::Output {
        Self(self.0.checked_shr(rhs as u32).unwrap_or(0))
    }
}

impl<const N: usize> Traceable for Unsigned<N> {
    fn add_vars(vars: &mut TraceVars) {
        vars.wire(N as u32);
    }

    fn trace(&self, id: &mut IdCode, tracer: &mut Tracer) -> io::Result<()> {
        let value = self.0;
        tracer.change_bits(id, (0 .. N).rev().map(move |idx| (value >> idx) & 1 == 1))
    }
}

pub type U<const N: usize> = Unsigned<N>;
