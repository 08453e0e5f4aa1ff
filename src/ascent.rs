//! Ascent outside of the decompression zone and the first decompression
//! stop search.

use alloc::vec::Vec;

use libm::floor;

use crate::config::SearchStrategy;
use crate::engine::Engine;
use crate::gas::GasMix;
use crate::model::DecoModel;
use crate::search::{bisect_find, recurse_while};
use crate::step::DiveStep;
use crate::units::{depth_to_time, on_stop_grid, round_to, DECO_STOP_INTERVAL, EPSILON};

/// Outcome of the first decompression stop search within one ascent stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FirstStop {
    /// ascent start is already the first stop
    AtStart,
    /// first stop lies between ascent start and stage target
    Found(DiveStep),
    /// stage target is reachable without a stop
    NotFound,
}

/// Ascent from one depth to a shallower one split on the stop grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct GridAscent {
    /// whole stop intervals
    pub n: usize,
    /// seconds to reach the first grid depth
    pub dt: f64,
    /// seconds per stop interval
    pub t3: f64,
}

impl GridAscent {
    /// Seconds to ascend `dt` plus `k` stop intervals.
    pub fn time(&self, k: usize) -> f64 {
        k as f64 * self.t3 + self.dt
    }
}

impl<M: DecoModel> Engine<M> {
    pub(crate) fn grid_ascent(&self, start_abs_p: f64, abs_p: f64) -> GridAscent {
        let rate = self.config.ascent_rate;
        let depth = self.units.to_depth(start_abs_p) - self.units.to_depth(abs_p);
        let n = floor(round_to(depth / DECO_STOP_INTERVAL, 9)).max(0.0);
        let rest = round_to(depth - n * DECO_STOP_INTERVAL, 9).max(0.0);
        GridAscent {
            n: n as usize,
            dt: depth_to_time(rest, rate),
            t3: depth_to_time(DECO_STOP_INTERVAL, rate),
        }
    }

    /// Stages of ascent outside the decompression zone: each ends at the
    /// switch depth of the next mix rounded up to the stop grid, the last
    /// one at the surface.
    pub(crate) fn free_ascent_stages(&self, mixes: &[GasMix]) -> Vec<(f64, GasMix)> {
        mixes
            .iter()
            .enumerate()
            .map(|(i, gas)| {
                let target = match mixes.get(i + 1) {
                    Some(next) => self.units.to_pressure(next.depth_ceil() as f64),
                    None => self.units.surface_pressure,
                };
                (target, *gas)
            })
            .collect()
    }

    /// Ascend through `stages` until the surface or the first
    /// decompression stop is reached.
    ///
    /// The last returned step is the first stop, or the surface when no
    /// stop is needed. Nothing is returned when `start` itself is the first
    /// stop.
    pub(crate) fn free_staged_ascent(&self, start: &DiveStep, stages: &[(f64, GasMix)]) -> Vec<DiveStep> {
        let mut steps = Vec::new();
        let mut step = *start;

        for (abs_p, gas) in stages {
            if step.gas != *gas {
                // a gas switch driving us into the deco zone leaves `step`
                // as the first decompression stop
                let Some(switch) = self.free_ascent_switch_gas(&step, gas) else {
                    break;
                };
                if let Some(last) = switch.last() {
                    step = *last;
                }
                steps.extend(switch);
            }

            if *abs_p > step.abs_p - EPSILON {
                continue;
            }

            match self.find_first_stop(&step, *abs_p, gas) {
                FirstStop::AtStart => break,
                FirstStop::Found(stop) => {
                    steps.push(stop);
                    break;
                }
                FirstStop::NotFound => {
                    let ascent = self.grid_ascent(step.abs_p, *abs_p);
                    step = self.step_ascent(&step, ascent.time(ascent.n), gas, None);
                    steps.push(step);
                }
            }
        }
        steps
    }

    /// Switch to `gas` near its switch depth during free ascent.
    ///
    /// Ascends to the switch depth on the current gas, switches and
    /// continues to the stop grid depth at or above it. Returns `None` when
    /// any of these steps would breach the ceiling.
    fn free_ascent_switch_gas(&self, step: &DiveStep, gas: &GasMix) -> Option<Vec<DiveStep>> {
        let rate = self.config.ascent_rate;
        let gp = self.units.to_pressure(gas.depth as f64);
        debug_assert!(step.abs_p - gp < self.units.stop_interval_pressure() + EPSILON);

        let mut steps = Vec::with_capacity(3);
        let mut current = *step;
        if current.abs_p - gp > EPSILON {
            let depth = self.units.to_depth(current.abs_p) - gas.depth as f64;
            current = self.step_ascent(&current, depth_to_time(depth, rate), &current.gas, None);
            steps.push(current);
        }

        current = current.switch_gas(*gas);
        steps.push(current);

        let depth = self.units.to_depth(current.abs_p) - gas.depth_floor() as f64;
        if depth > EPSILON {
            current = self.step_ascent(&current, depth_to_time(depth, rate), gas, None);
            steps.push(current);
        }

        if steps.iter().all(|s| self.inv_limit(s.abs_p, &s.state)) {
            tracing::debug!(o2 = gas.o2, he = gas.he, depth = gas.depth, "gas switch");
            Some(steps)
        } else {
            tracing::debug!(
                o2 = gas.o2,
                he = gas.he,
                depth = gas.depth,
                "gas switch aborted, first deco stop reached"
            );
            None
        }
    }

    /// Find the first decompression stop between `start` and `abs_p`.
    ///
    /// Candidate stops are the stop grid depths in between; the search
    /// looks for the largest `k` such that ascending to the `k`-th candidate
    /// keeps the ascent invariant.
    pub fn find_first_stop(&self, start: &DiveStep, abs_p: f64, gas: &GasMix) -> FirstStop {
        debug_assert!(on_stop_grid(self.units.to_depth(abs_p)));
        if start.abs_p - abs_p <= EPSILON {
            return FirstStop::NotFound;
        }

        let ascent = self.grid_ascent(start.abs_p, abs_p);
        let n = ascent.n;
        let clear = |k: usize| {
            let step = self.step_ascent(start, ascent.time(k), gas, None);
            tracing::trace!(k, abs_p = step.abs_p, "first stop candidate");
            self.inv_limit(step.abs_p, &step.state)
        };
        let has_rest = ascent.dt > EPSILON;

        let k = match self.config.search {
            SearchStrategy::Bisect => bisect_find(n, clear),
            SearchStrategy::Linear => {
                recurse_while(|k: &usize| *k == 0 || (*k <= n && clear(*k)), |k| k + 1, 0)
            }
        };

        let stop = if k == n {
            if n == 0 && has_rest && !clear(0) {
                FirstStop::AtStart
            } else {
                FirstStop::NotFound
            }
        } else if k > 0 {
            debug_assert!(!clear(k + 1), "first stop not at the ceiling boundary");
            FirstStop::Found(self.step_ascent(start, ascent.time(k), gas, None))
        } else if has_rest && clear(0) {
            FirstStop::Found(self.step_ascent(start, ascent.time(0), gas, None))
        } else {
            FirstStop::AtStart
        };

        match &stop {
            FirstStop::Found(step) => {
                tracing::debug!(depth = self.units.to_depth(step.abs_p), "first deco stop found")
            }
            FirstStop::AtStart => {
                tracing::debug!(depth = self.units.to_depth(start.abs_p), "already at first deco stop")
            }
            FirstStop::NotFound => (),
        }
        stop
    }
}
