//! Ascent through the decompression zone.

use alloc::vec::Vec;

use libm::floor;

use crate::config::SearchStrategy;
use crate::engine::Engine;
use crate::error::{InvariantViolation, Result};
use crate::gas::GasMix;
use crate::model::{DecoModel, DecoState};
use crate::search::{bisect_find, recurse_while};
use crate::step::{DiveStep, Phase};
use crate::units::{depth_to_time, on_stop_grid, round_to, DECO_STOP_INTERVAL};

/// Longest stay at a single decompression stop, in minutes.
pub const MAX_STOP_MINUTES: u32 = 24 * 60;

/// One decompression stop to be executed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StopPlan {
    /// stop depth, meters
    pub depth: f64,
    /// gas breathed at the stop and on the ascent after it
    pub gas: GasMix,
    /// seconds to reach the next stop or the surface
    pub ascent_time: f64,
    /// gradient factor allowed once the stop is left
    pub gf: f64,
}

impl<M: DecoModel> Engine<M> {
    /// Deco zone stages: each ends at the switch depth of the next mix
    /// rounded down to the stop grid, the last one at the surface. Stages
    /// not shallower than `start_abs_p` are dropped.
    pub(crate) fn deco_ascent_stages(&self, start_abs_p: f64, mixes: &[GasMix]) -> Vec<(f64, GasMix)> {
        let start = self.units.to_depth(start_abs_p);
        mixes
            .iter()
            .enumerate()
            .map(|(i, gas)| {
                let depth = mixes.get(i + 1).map_or(0, GasMix::depth_floor);
                (depth as f64, *gas)
            })
            .filter(|(depth, _)| *depth < start)
            .collect()
    }

    /// Decompression stops from the first stop at `step` to the surface.
    ///
    /// The gradient factor grows by an equal increment at every stop and
    /// reaches `gf_high` on the final ascent to the surface. With the last
    /// stop at 6m the 3m stop is dropped and its increment folded into the
    /// 6m stop.
    pub(crate) fn deco_stops(&self, step: &DiveStep, stages: &[(f64, GasMix)]) -> Vec<StopPlan> {
        let rate = self.config.ascent_rate;
        let start = self.units.to_depth(step.abs_p);

        let mut depths = Vec::new();
        let mut grid = floor(round_to(start / DECO_STOP_INTERVAL, 9)) * DECO_STOP_INTERVAL;
        if !on_stop_grid(start) {
            depths.push(start);
        }
        while grid > 0.0 {
            depths.push(grid);
            grid -= DECO_STOP_INTERVAL;
        }
        if depths.is_empty() {
            return Vec::new();
        }

        let gf_step = (self.model.gf_high() - self.model.gf_low()) / depths.len() as f64;
        let mut gf = step.state.gf;
        let mut plans = Vec::with_capacity(depths.len());

        for (i, depth) in depths.iter().enumerate() {
            let gas = stages
                .iter()
                .find(|(target, _)| *target < *depth)
                .map_or(step.gas, |(_, gas)| *gas);
            gf += gf_step;

            if self.config.last_stop_6m && libm::fabs(*depth - 6.0) < 1e-6 {
                plans.push(StopPlan {
                    depth: *depth,
                    gas,
                    ascent_time: depth_to_time(*depth, rate),
                    gf: gf + gf_step,
                });
                break;
            }

            let next = depths.get(i + 1).copied().unwrap_or(0.0);
            plans.push(StopPlan {
                depth: *depth,
                gas,
                ascent_time: depth_to_time(*depth - next, rate),
                gf,
            });
        }
        tracing::debug!(stops = plans.len(), gf_step, "deco stops planned");
        plans
    }

    /// Length of the stop at `step`, in whole minutes, and the tissue state
    /// at its end.
    ///
    /// The stop lasts until ascending for `plan.ascent_time` respects the
    /// ceiling at `plan.gf`, and at least one minute.
    pub(crate) fn deco_stop(&self, step: &DiveStep, plan: &StopPlan) -> Result<(u32, DecoState)> {
        let stay = |state: &DecoState, minutes: u32| {
            self.model
                .load(step.abs_p, minutes as f64 * 60.0, &plan.gas, 0.0, state)
        };
        let cannot_ascend =
            |state: &DecoState| !self.can_ascend(step.abs_p, plan.ascent_time, state, plan.gf);

        let (minutes, state) = match self.config.search {
            SearchStrategy::Bisect => {
                let block = self.config.deco_stop_search_time;
                let (time, state) = recurse_while(
                    |(time, state): &(u32, DecoState)| *time < MAX_STOP_MINUTES && cannot_ascend(state),
                    |(time, state)| (time + block, stay(state, block)),
                    (0, step.state),
                );
                let k = bisect_find(block as usize, |k| cannot_ascend(&stay(&state, k as u32))) as u32;
                (time + k + 1, stay(&state, k + 1))
            }
            SearchStrategy::Linear => {
                let (time, state) = recurse_while(
                    |(time, state): &(u32, DecoState)| *time < MAX_STOP_MINUTES && cannot_ascend(state),
                    |(time, state)| (time + 1, stay(state, 1)),
                    (0, step.state),
                );
                (time + 1, stay(&state, 1))
            }
        };

        // the search gives up at the bound with the ceiling still in the way
        if minutes > MAX_STOP_MINUTES || cannot_ascend(&state) {
            return Err(InvariantViolation::StopTooLong {
                depth: plan.depth,
                minutes,
            }
            .into());
        }
        tracing::debug!(depth = plan.depth, minutes, gf = plan.gf, "deco stop");
        Ok((minutes, state))
    }

    /// Steps of one decompression stop: optional gas switch, the stop
    /// itself and the ascent to the next stop.
    pub(crate) fn deco_staged_step(&self, step: &DiveStep, plan: &StopPlan) -> Result<Vec<DiveStep>> {
        let mut steps = Vec::with_capacity(3);
        let mut current = *step;
        if current.gas != plan.gas {
            tracing::debug!(o2 = plan.gas.o2, he = plan.gas.he, depth = plan.depth, "gas switch at deco stop");
            current = current.switch_gas(plan.gas);
            steps.push(current);
        }

        let (minutes, state) = self.deco_stop(&current, plan)?;
        let time = current.time + minutes as f64 * 60.0;
        current = current.next(Phase::DecoStop, current.abs_p, time, plan.gas, state);
        steps.push(current);

        steps.push(self.step_ascent(&current, plan.ascent_time, &plan.gas, Some(plan.gf)));
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::error::DecoError;

    fn first_stop(engine: &Engine, depth: f64) -> DiveStep {
        let start = engine.step_start(GasMix::air());
        let time = depth_to_time(depth, engine.config.descent_rate);
        engine.step_descent(&start, time, &GasMix::air())
    }

    #[test]
    fn test_deco_ascent_stages() {
        let engine = Engine::default();
        let mixes = [
            GasMix::air(),
            GasMix::new(22, 50, 0).unwrap(),
            GasMix::new(6, 80, 0).unwrap(),
        ];
        let stages = engine.deco_ascent_stages(engine.units.to_pressure(18.0), &mixes);
        assert_eq!(stages, [(6.0, mixes[1]), (0.0, mixes[2])]);

        let stages = engine.deco_ascent_stages(engine.units.to_pressure(30.0), &mixes);
        assert_eq!(stages.len(), 3);
        assert_eq!(stages[0], (21.0, mixes[0]));
    }

    #[test]
    fn test_deco_stops_gf_reaches_high() {
        let engine = Engine::default();
        let step = first_stop(&engine, 12.0);
        let stages = engine.deco_ascent_stages(step.abs_p, &[GasMix::air()]);
        let plans = engine.deco_stops(&step, &stages);

        let depths: Vec<f64> = plans.iter().map(|p| p.depth).collect();
        assert_eq!(depths, [12.0, 9.0, 6.0, 3.0]);
        assert!(plans.iter().all(|p| p.ascent_time == 18.0));
        assert!(libm::fabs(plans[3].gf - 0.85) < 1e-9);
        assert!(plans.windows(2).all(|w| w[0].gf < w[1].gf));
    }

    #[test]
    fn test_deco_stops_last_stop_6m() {
        let config = EngineConfig::default().with_last_stop_6m(true);
        let engine = Engine::new(config).unwrap();
        let step = first_stop(&engine, 12.0);
        let plans = engine.deco_stops(&step, &[(0.0, GasMix::air())]);

        assert_eq!(plans.len(), 3);
        assert_eq!(plans[2].depth, 6.0);
        assert_eq!(plans[2].ascent_time, 36.0);
        assert!(libm::fabs(plans[2].gf - 0.85) < 1e-9);
    }

    #[test]
    fn test_deco_stops_off_grid_start() {
        let engine = Engine::default();
        let step = first_stop(&engine, 10.0);
        let plans = engine.deco_stops(&step, &[(0.0, GasMix::air())]);
        let depths: Vec<f64> = plans.iter().map(|p| p.depth).collect();
        assert_eq!(depths, [10.0, 9.0, 6.0, 3.0]);
        assert!(libm::fabs(plans[0].ascent_time - 6.0) < 1e-6);

        // the off-grid stop takes its own gradient factor increment
        let gf_step = (0.85 - 0.3) / 4.0;
        for (i, plan) in plans.iter().enumerate() {
            let gf = 0.3 + gf_step * (i + 1) as f64;
            assert!(libm::fabs(plan.gf - gf) < 1e-9, "{}m: {} != {}", plan.depth, plan.gf, gf);
        }
    }

    #[test]
    fn test_deco_stop_too_long() {
        for search in [SearchStrategy::Bisect, SearchStrategy::Linear] {
            let config = EngineConfig::default().with_search(search);
            let engine = Engine::new(config).unwrap();
            let start = first_stop(&engine, 46.0);
            let bottom = engine.step_const(&start, 120.0 * 60.0, &GasMix::air(), Phase::Const);
            let stop = engine.step_ascent(&bottom, depth_to_time(40.0, 10.0), &GasMix::air(), None);
            // straight to the surface from 6m at a low gradient factor
            let plan = StopPlan {
                depth: 6.0,
                gas: GasMix::air(),
                ascent_time: 36.0,
                gf: 0.3,
            };
            assert!(matches!(
                engine.deco_stop(&stop, &plan),
                Err(DecoError::ModelInvariant(InvariantViolation::StopTooLong { minutes, .. }))
                    if minutes >= MAX_STOP_MINUTES
            ), "{:?}", search);
        }
    }

    #[test]
    fn test_deco_stop_whole_minutes() {
        let engine = Engine::default();
        let start = first_stop(&engine, 30.0);
        let bottom = engine.step_const(&start, 30.0 * 60.0, &GasMix::air(), Phase::Const);
        let stop = engine.step_ascent(&bottom, 90.0, &GasMix::air(), None);
        let plan = StopPlan {
            depth: 15.0,
            gas: GasMix::air(),
            ascent_time: 18.0,
            gf: 0.4,
        };
        let steps = engine.deco_staged_step(&stop, &plan).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].phase, Phase::DecoStop);

        let minutes = (steps[0].time - stop.time) / 60.0;
        assert!(minutes >= 1.0);
        assert_eq!(minutes, floor(minutes));
        assert!(engine.inv_limit(steps[1].abs_p, &steps[1].state));
    }
}
