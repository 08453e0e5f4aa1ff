//! Descent to the bottom.

use alloc::vec::Vec;

use crate::engine::Engine;
use crate::gas::GasMix;
use crate::model::DecoModel;
use crate::step::DiveStep;
use crate::units::{depth_to_time, EPSILON};

impl<M: DecoModel> Engine<M> {
    /// Descent stages to `end_abs_p`, each a target pressure and the gas
    /// breathed on the way there.
    ///
    /// A stage ends at the switch depth of the next mix. No final stage is
    /// produced when the last mix switches exactly at the destination, the
    /// switch to it is left to the caller.
    pub(crate) fn descent_stages(&self, end_abs_p: f64, mixes: &[GasMix]) -> Vec<(f64, GasMix)> {
        let mut stages: Vec<(f64, GasMix)> = mixes
            .windows(2)
            .map(|w| (self.units.to_pressure(w[1].depth as f64), w[0]))
            .collect();
        if let Some(last) = mixes.last() {
            if libm::fabs(self.units.to_pressure(last.depth as f64) - end_abs_p) >= EPSILON {
                stages.push((end_abs_p, *last));
            }
        }
        stages
    }

    /// Steps from the surface down to `abs_p`, switching gas at each mix
    /// switch depth and ending on the last mix.
    pub(crate) fn dive_descent(&self, abs_p: f64, mixes: &[GasMix]) -> Vec<DiveStep> {
        let mut steps = Vec::new();
        let (Some(first), Some(bottom)) = (mixes.first(), mixes.last()) else {
            return steps;
        };

        let mut step = self.step_start(*first);
        steps.push(step);

        for (target, gas) in self.descent_stages(abs_p, mixes) {
            if step.gas != gas {
                step = step.switch_gas(gas);
                steps.push(step);
            }
            let depth = self.units.to_depth(target) - self.units.to_depth(step.abs_p);
            if depth > EPSILON {
                let time = depth_to_time(depth, self.config.descent_rate);
                step = self.step_descent(&step, time, &gas);
                steps.push(step);
            }
        }

        if step.gas != *bottom {
            tracing::debug!(depth = bottom.depth, "switching to bottom gas");
            step = step.switch_gas(*bottom);
            steps.push(step);
        }
        steps
    }
}
