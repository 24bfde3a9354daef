use std::{
    cmp::Ordering,
    fmt::{self, Display},
    io,
};

use crate::{
    cast::CastFrom,
    signal::SignalValue,
    trace::{IdCode, TraceVars, Traceable, Tracer},
    unsigned::{unsigned_value, Unsigned},
};

const fn sign_extend(val: i128, width: usize) -> i128 {
    if width >= 128 {
        val
    } else {
        let shift = 128 - width as u32;
        (val << shift) >> shift
    }
}

/// Fixed-width two's complement value, kept sign-extended to `i128`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Signed<const N: usize>(i128);

impl<const N: usize> Signed<N> {
    pub const WIDTH: usize = N;
    pub const MIN: Self = Self(sign_extend(1 << (N - 1), N));
    pub const MAX: Self = Self(!Self::MIN.0);

    /// Reinterprets the low `N` bits of `bits` as a two's complement value.
    #[inline]
    pub const fn from_bits(bits: u128) -> Self {
        Self(sign_extend(bits as i128, N))
    }

    #[inline]
    pub const fn value(self) -> i128 {
        self.0
    }

    #[inline]
    pub const fn to_bits(self) -> u128 {
        unsigned_value(self.0 as u128, N)
    }
}

impl<const N: usize> SignalValue for Signed<N> {}

macro_rules! impl_for_signed_prim_ty {
    ($( $prim:ty ),+) => {
        $(
            impl SignalValue for $prim {}

            impl<const N: usize> CastFrom<$prim> for Signed<N> {
                #[inline]
                fn cast_from(val: $prim) -> Self {
                    Self::from_bits(val as i128 as u128)
                }
            }

            impl<const N: usize> CastFrom<Signed<N>> for $prim {
                #[inline]
                fn cast_from(val: Signed<N>) -> Self {
                    val.0 as $prim
                }
            }
        )+
    };
}

impl_for_signed_prim_ty!(i8, i16, i32, i64, i128, isize);

/// Zero-extends (or truncates) the unsigned bits and reads them as two's complement.
impl<const N: usize, const M: usize> CastFrom<Unsigned<M>> for Signed<N> {
    #[inline]
    fn cast_from(from: Unsigned<M>) -> Self {
        Self::from_bits(from.value())
    }
}

impl<const N: usize, const M: usize> CastFrom<Signed<M>> for Unsigned<N> {
    #[inline]
    fn cast_from(from: Signed<M>) -> Self {
        Self::from_masked(from.0 as u128)
    }
}

impl<const N: usize> PartialEq<i128> for Signed<N> {
    #[inline]
    fn eq(&self, other: &i128) -> bool {
        self.0 == *other
    }
}

impl<const N: usize> PartialOrd<i128> for Signed<N> {
    #[inline]
    fn partial_cmp(&self, other: &i128) -> Option<Ordering> {
        self.0.partial_cmp(other)
    }
}

impl<const N: usize> Display for Signed<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<const N: usize> Traceable for Signed<N> {
    #[inline]
    fn add_vars(vars: &mut TraceVars) {
        vars.wire(N as u32);
    }

    #[inline]
    fn trace(&self, id: &mut IdCode, tracer: &mut Tracer) -> io::Result<()> {
        Unsigned::<N>::from_masked(self.to_bits()).trace(id, tracer)
    }
}
