use derive_where::derive_where;

use crate::{eval::EvalCtx, signal::SignalValue};

/// Signal body memoized per evaluation time step, so fan-out to several readers
/// does not advance the underlying state more than once.
#[derive_where(Debug; T)]
pub struct SignalFn<T: SignalValue> {
    step: u64,
    cached: Option<T>,
    #[derive_where(skip)]
    f: Box<dyn FnMut(&mut EvalCtx) -> T>,
}

impl<T: SignalValue> SignalFn<T> {
    pub(crate) fn new(f: impl FnMut(&mut EvalCtx) -> T + 'static) -> Self {
        Self {
            step: u64::MAX,
            cached: None,
            f: Box::new(f),
        }
    }

    pub(crate) fn next_val(&mut self, ctx: &mut EvalCtx) -> T {
        let step = ctx.step();
        match &self.cached {
            Some(value) if self.step == step => value.clone(),
            _ => {
                let value = (self.f)(ctx);
                self.cached = Some(value.clone());
                self.step = step;
                value
            }
        }
    }
}
