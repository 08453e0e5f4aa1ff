//! Lazily computed dive profile.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::mem;

use crate::deco::StopPlan;
use crate::engine::Engine;
use crate::error::Result;
use crate::model::DecoModel;
use crate::step::{DiveStep, Phase};

/// Consumer of dive steps, called once per step in production order.
///
/// `history` holds every step produced before `step`. An error stops the
/// profile.
pub trait StepObserver {
    fn observe(&mut self, step: &DiveStep, history: &[DiveStep]) -> Result<()>;
}

#[derive(Debug, Clone)]
enum Stage {
    Descent,
    Bottom,
    Ascent,
    Deco { plans: Vec<StopPlan>, next: usize },
    Done,
}

/// Dive profile iterator.
///
/// Each call to `next` computes at most one batch of steps from the last
/// produced one: the descent, the bottom, the ascent to the first stop or
/// a single decompression stop. Steps already produced are kept in the
/// profile history.
///
/// The engine stays borrowed while the profile lives, so its gas mixes and
/// parameters cannot change halfway through.
#[derive(Debug)]
pub struct DiveProfile<'e, M: DecoModel> {
    engine: &'e Engine<M>,
    depth: f64,
    bottom_time: f64,
    stage: Stage,
    last: Option<DiveStep>,
    pending: VecDeque<DiveStep>,
    history: Vec<DiveStep>,
}

impl<'e, M: DecoModel> DiveProfile<'e, M> {
    /// Profile of a dive to `depth` meters staying `bottom_time` seconds at
    /// the bottom after the descent.
    pub(crate) fn new(engine: &'e Engine<M>, depth: f64, bottom_time: f64) -> Self {
        DiveProfile {
            engine,
            depth,
            bottom_time,
            stage: Stage::Descent,
            last: None,
            pending: VecDeque::new(),
            history: Vec::new(),
        }
    }

    /// Steps produced so far.
    pub fn history(&self) -> &[DiveStep] {
        &self.history
    }

    /// Step `step` was computed from.
    pub fn previous(&self, step: &DiveStep) -> Option<&DiveStep> {
        step.prev.and_then(|i| self.history.get(i))
    }

    /// Hand every produced step to `observer` before yielding it.
    pub fn observe<'o>(self, observer: &'o mut dyn StepObserver) -> Broadcast<'e, 'o, M> {
        Broadcast {
            profile: self,
            observers: alloc::vec![observer],
        }
    }

    fn emit(&mut self, steps: impl IntoIterator<Item = DiveStep>) {
        for step in steps {
            self.last = Some(step);
            self.pending.push_back(step);
        }
    }

    fn advance(&mut self) -> Result<()> {
        let engine = self.engine;
        match mem::replace(&mut self.stage, Stage::Done) {
            Stage::Descent => {
                let abs_p = engine.units.to_pressure(self.depth);
                let steps = engine.dive_descent(abs_p, &engine.gases.descent_mixes());
                self.emit(steps);
                self.stage = Stage::Bottom;
            }
            Stage::Bottom => {
                if let Some(last) = self.last {
                    let bottom = engine.step_const(&last, self.bottom_time, &last.gas, Phase::Const);
                    self.emit([bottom]);
                    self.stage = Stage::Ascent;
                }
            }
            Stage::Ascent => {
                let Some(bottom) = self.last else {
                    return Ok(());
                };
                if let Some(surface) = engine.ndl_ascent(&bottom, &bottom.gas) {
                    tracing::debug!(depth = self.depth, "no-decompression dive");
                    self.emit([surface]);
                    return Ok(());
                }

                let mixes = engine.gases.ascent_mixes();
                let stages = engine.free_ascent_stages(&mixes);
                let steps = engine.free_staged_ascent(&bottom, &stages);
                self.emit(steps);

                let first = self.last.unwrap_or(bottom);
                if !engine.units.at_surface(first.abs_p) {
                    let stages = engine.deco_ascent_stages(first.abs_p, &mixes);
                    let plans = engine.deco_stops(&first, &stages);
                    self.stage = Stage::Deco { plans, next: 0 };
                }
            }
            Stage::Deco { plans, next } => {
                let (Some(plan), Some(last)) = (plans.get(next), self.last) else {
                    return Ok(());
                };
                let steps = engine.deco_staged_step(&last, plan)?;
                self.emit(steps);
                self.stage = Stage::Deco {
                    plans,
                    next: next + 1,
                };
            }
            Stage::Done => (),
        }
        Ok(())
    }
}

impl<M: DecoModel> Iterator for DiveProfile<'_, M> {
    type Item = Result<DiveStep>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(step) = self.pending.pop_front() {
                debug_assert_eq!(step.index, self.history.len());
                self.history.push(step);
                return Some(Ok(step));
            }
            if matches!(self.stage, Stage::Done) {
                return None;
            }
            if let Err(e) = self.advance() {
                self.stage = Stage::Done;
                return Some(Err(e));
            }
        }
    }
}

/// Dive profile handing each step to a set of observers before yielding
/// it. Created with [`DiveProfile::observe`].
pub struct Broadcast<'e, 'o, M: DecoModel> {
    profile: DiveProfile<'e, M>,
    observers: Vec<&'o mut dyn StepObserver>,
}

impl<'e, 'o, M: DecoModel> Broadcast<'e, 'o, M> {
    pub fn observe(mut self, observer: &'o mut dyn StepObserver) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn history(&self) -> &[DiveStep] {
        self.profile.history()
    }

    /// Drive the profile to its end, returning the first error.
    pub fn run(self) -> Result<()> {
        for step in self {
            step?;
        }
        Ok(())
    }
}

impl<M: DecoModel> Iterator for Broadcast<'_, '_, M> {
    type Item = Result<DiveStep>;

    fn next(&mut self) -> Option<Self::Item> {
        let step = match self.profile.next()? {
            Ok(step) => step,
            Err(e) => return Some(Err(e)),
        };
        let before = &self.profile.history[..step.index];
        let failed = self
            .observers
            .iter_mut()
            .find_map(|observer| observer.observe(&step, before).err());
        match failed {
            Some(e) => {
                self.profile.stage = Stage::Done;
                self.profile.pending.clear();
                Some(Err(e))
            }
            None => Some(Ok(step)),
        }
    }
}
