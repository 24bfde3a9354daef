mod reg;

use std::{cell::RefCell, marker::PhantomData, rc::Rc};

use derive_where::derive_where;
pub use reg::reg;

use crate::{
    domain::ClockDomain,
    eval::{Eval, EvalCtx},
    signal_fn::SignalFn,
};

pub trait SignalValue: Clone + 'static {}

/// A value changing over time in clock domain `D`.
///
/// Signals are cheap to clone: clones share the same underlying state and
/// observe the same value at a given evaluation step.
#[derive_where(Debug, Clone; T)]
pub struct Signal<D: ClockDomain, T: SignalValue> {
    #[derive_where(skip)]
    _dom: PhantomData<D>,
    next: Rc<RefCell<SignalFn<T>>>,
}

impl<D: ClockDomain, T: SignalValue> Signal<D, T> {
    pub(crate) fn new(f: impl FnMut(&mut EvalCtx) -> T + 'static) -> Self {
        Self {
            _dom: PhantomData,
            next: Rc::new(RefCell::new(SignalFn::new(f))),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub(crate) fn next(&mut self, ctx: &mut EvalCtx) -> T {
        self.next.borrow_mut().next_val(ctx)
    }

    pub fn lift(value: T) -> Signal<D, T> {
        Self::new(move |_| value.clone())
    }

    pub fn map<U: SignalValue, F>(&self, f: F) -> Signal<D, U>
    where
        F: Fn(T) -> U + 'static,
    {
        let mut inner = self.clone();
        Signal::new(move |ctx| {
            let val = inner.next(ctx);
            (f)(val)
        })
    }
}

impl<T: SignalValue, D: ClockDomain> From<T> for Signal<D, T> {
    fn from(value: T) -> Self {
        Self::lift(value)
    }
}

impl<D: ClockDomain, T: SignalValue> Eval<D> for Signal<D, T> {
    type Value = T;

    #[inline]
    fn next(&mut self, ctx: &mut EvalCtx) -> Self::Value {
        Signal::next(self, ctx)
    }
}
