//! Audit of produced dive steps against the decompression model.

use libm::{fabs, round};

use crate::error::{InvariantViolation, Result};
use crate::model::DecoModel;
use crate::profile::StepObserver;
use crate::step::{DiveStep, Phase};
use crate::units::{on_stop_grid, Units, EPSILON};

/// Step observer failing the profile on the first step that breaks the
/// model: time running backwards, rising above the surface, ascending past
/// the ceiling or a decompression stop off the grid or not lasting a
/// positive whole number of minutes.
///
/// The first stop may sit off the grid when the dive enters the
/// decompression zone at an off-grid depth.
pub struct ProfileValidator<'m, M: DecoModel> {
    model: &'m M,
    units: Units,
    stops: usize,
}

impl<'m, M: DecoModel> ProfileValidator<'m, M> {
    pub fn new(model: &'m M, units: Units) -> Self {
        ProfileValidator {
            model,
            units,
            stops: 0,
        }
    }

    fn check(&mut self, step: &DiveStep, prev: Option<&DiveStep>) -> core::result::Result<(), InvariantViolation> {
        let index = step.index;
        if step.abs_p < self.units.surface_pressure - EPSILON {
            return Err(InvariantViolation::AboveSurface { index });
        }

        if let Some(prev) = prev {
            if step.time < prev.time {
                return Err(InvariantViolation::TimeReversed { index });
            }
        }

        match step.phase {
            Phase::Ascent => {
                let limit = self.model.ceiling_limit(&step.state, None);
                if step.abs_p < limit {
                    return Err(InvariantViolation::CeilingBreached {
                        index,
                        abs_p: step.abs_p,
                        limit,
                    });
                }
            }
            Phase::DecoStop => {
                let depth = self.units.to_depth(step.abs_p);
                if !on_stop_grid(depth) && self.stops > 0 {
                    return Err(InvariantViolation::StopOffGrid { depth });
                }
                self.stops += 1;
                let duration = prev.map_or(0.0, |p| step.time - p.time);
                let minutes = duration / 60.0;
                if !(minutes > 0.0 && fabs(minutes - round(minutes)) < 1e-6) {
                    return Err(InvariantViolation::StopLength { depth, duration });
                }
            }
            _ => (),
        }
        Ok(())
    }
}

impl<M: DecoModel> StepObserver for ProfileValidator<'_, M> {
    fn observe(&mut self, step: &DiveStep, history: &[DiveStep]) -> Result<()> {
        let prev = step.prev.and_then(|i| history.get(i));
        self.check(step, prev).map_err(|e| {
            tracing::warn!(index = step.index, error = %e, "invalid dive step");
            e.into()
        })
    }
}
