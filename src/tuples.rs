use crate::{
    bundle::Bundle,
    domain::ClockDomain,
    signal::{Signal, SignalValue},
};

macro_rules! impl_tuple_traits {
    ($( $ty:ident => $var:ident ),+) => {
        impl<$( $ty: SignalValue ),+> SignalValue for ($( $ty, )+) {}

        impl<D: ClockDomain, $( $ty: SignalValue ),+> Bundle for ($( Signal<D, $ty>, )+) {
            type Bundled = Signal<D, ($( $ty, )+)>;

            fn bundle(self) -> Self::Bundled {
                let ($( mut $var, )+) = self;
                Signal::new(move |ctx| ($( $var.next(ctx), )+))
            }
        }
    };
}

impl_tuple_traits!(A => a);
impl_tuple_traits!(A => a, B => b);
impl_tuple_traits!(A => a, B => b, C => c);
impl_tuple_traits!(A => a, B => b, C => c, E => e);
