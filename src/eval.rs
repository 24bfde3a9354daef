use crate::domain::{Clock, ClockDomain};

/// Evaluation position handed to every signal body.
#[derive(Debug)]
pub struct EvalCtx {
    step: u64,
}

impl EvalCtx {
    pub(crate) fn new() -> Self {
        Self { step: 0 }
    }

    #[inline]
    pub(crate) fn step(&self) -> u64 {
        self.step
    }

    #[inline]
    pub(crate) fn advance(&mut self) {
        self.step = self.step.wrapping_add(1);
    }
}

/// Who toggles the clock between evaluation steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockDrive {
    /// The evaluator toggles the clock before every step.
    #[default]
    Auto,
    /// The caller toggles the clock.
    Manual,
}

pub trait Eval<D: ClockDomain>: Sized {
    type Value;

    fn next(&mut self, ctx: &mut EvalCtx) -> Self::Value;

    #[inline]
    fn eval(self, clk: &Clock<D>) -> EvalIter<D, Self> {
        self.eval_driven(clk, ClockDrive::Auto)
    }

    fn eval_driven(self, clk: &Clock<D>, drive: ClockDrive) -> EvalIter<D, Self> {
        EvalIter {
            ctx: EvalCtx::new(),
            source: self,
            clk: clk.clone(),
            drive,
        }
    }
}

/// Steps a signal through time, half a clock period per step. With
/// [`ClockDrive::Auto`] the first step is a rising edge.
#[derive(Debug)]
pub struct EvalIter<D: ClockDomain, S> {
    ctx: EvalCtx,
    source: S,
    clk: Clock<D>,
    drive: ClockDrive,
}

impl<D: ClockDomain, S: Eval<D>> EvalIter<D, S> {
    pub fn half_step(&mut self) -> S::Value {
        if self.drive == ClockDrive::Auto {
            self.clk.toggle();
        }
        self.ctx.advance();
        self.source.next(&mut self.ctx)
    }

    /// Number of half steps taken so far.
    #[inline]
    pub fn steps(&self) -> u64 {
        self.ctx.step()
    }

    /// Time of the latest step in picoseconds, the first edge being at 0.
    /// Edges of the same kind are exactly one `PERIOD` apart.
    #[inline]
    pub fn timestamp(&self) -> u64 {
        let step = self.steps().saturating_sub(1);
        (step / 2) * D::PERIOD + (step % 2) * D::HALF_PERIOD
    }

    /// Advances a full clock period and returns the value seen right after
    /// the rising edge.
    pub fn next_tick(&mut self) -> S::Value {
        if self.clk.is_rising() {
            self.half_step();
        }
        let value = self.half_step();
        self.half_step();
        value
    }

    #[inline]
    pub fn ticks(self) -> Ticks<D, S> {
        Ticks(self)
    }
}

impl<D: ClockDomain, S: Eval<D>> Iterator for EvalIter<D, S> {
    type Item = S::Value;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.half_step())
    }
}

/// One value per clock period, see [`EvalIter::next_tick`].
#[derive(Debug)]
pub struct Ticks<D: ClockDomain, S>(EvalIter<D, S>);

impl<D: ClockDomain, S: Eval<D>> Iterator for Ticks<D, S> {
    type Item = S::Value;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.0.next_tick())
    }
}
