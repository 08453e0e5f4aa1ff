//! No-decompression limit.

use libm::floor;

use crate::engine::Engine;
use crate::error::{ConfigError, Result};
use crate::gas::GasMix;
use crate::model::DecoModel;
use crate::search::{bisect_find, recurse_while};
use crate::step::{DiveStep, Phase};
use crate::units::depth_to_time;

/// Upper bound of a reported no-decompression limit, in minutes.
pub const MAX_NDL: u32 = 999;

impl<M: DecoModel> Engine<M> {
    /// Direct ascent from `start` to the surface at `gf_high`.
    ///
    /// Returns the surface step if the ascent does not breach the ceiling.
    pub(crate) fn ndl_ascent(&self, start: &DiveStep, gas: &GasMix) -> Option<DiveStep> {
        let depth = self.units.to_depth(start.abs_p);
        let time = depth_to_time(depth, self.config.ascent_rate);
        let step = self.step_ascent(start, time, gas, Some(self.model.gf_high()));
        self.inv_limit(step.abs_p, &step.state).then_some(step)
    }

    /// Longest bottom time at `depth` meters, in whole minutes and descent
    /// included, allowing a direct ascent to the surface.
    ///
    /// Returns `0` when even the shortest bottom time needs decompression
    /// stops and caps the result at [`MAX_NDL`].
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn ndl(&self, depth: f64) -> Result<u32> {
        if !(depth > 0.0) {
            return Err(ConfigError::Depth(depth).into());
        }
        self.gases.validate(depth)?;
        let Some(bottom_gas) = self.gases.bottom().copied() else {
            return Err(ConfigError::NoBottomGas.into());
        };

        let abs_p = self.units.to_pressure(depth);
        let descent = self.dive_descent(abs_p, &self.gases.descent_mixes());
        let Some(start) = descent.last().copied() else {
            return Err(ConfigError::NoGas.into());
        };

        // first whole minute past the end of descent
        let t_min = floor(start.time / 60.0) as u32 + 1;
        let base = t_min as f64 * 60.0 - start.time;
        let clear = |j: u32| {
            let bottom = self.step_const(&start, base + j as f64 * 60.0, &bottom_gas, Phase::Const);
            self.ndl_ascent(&bottom, &bottom_gas).is_some()
        };

        if !clear(0) {
            tracing::debug!(depth, "no bottom time without deco stops");
            return Ok(0);
        }

        let block = self.config.deco_stop_search_time;
        let limit = MAX_NDL.saturating_sub(t_min);
        let j = recurse_while(|j: &u32| *j <= limit && clear(*j), |j| j + block, 0);
        let k = bisect_find(block as usize, |k| clear(j + k as u32)) as u32;

        let ndl = (t_min + j + k).min(MAX_NDL);
        tracing::debug!(depth, ndl, "no-decompression limit");
        Ok(ndl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn air_engine() -> Engine {
        let mut engine = Engine::default();
        engine.add_gas(0, 21, 0).unwrap();
        engine
    }

    #[test]
    fn test_ndl_decreases_with_depth() {
        let engine = air_engine();
        let shallow = engine.ndl(12.0).unwrap();
        let mid = engine.ndl(21.0).unwrap();
        let deep = engine.ndl(30.0).unwrap();
        assert!(shallow > mid, "{} > {}", shallow, mid);
        assert!(mid > deep, "{} > {}", mid, deep);
        assert!(deep > 0);
    }

    #[test]
    fn test_ndl_shallow_dive_is_capped() {
        let engine = air_engine();
        assert_eq!(engine.ndl(3.0).unwrap(), MAX_NDL);
    }

    #[test]
    fn test_ndl_matches_profile() {
        let engine = air_engine();
        let ndl = engine.ndl(24.0).unwrap() as f64;

        let within = engine.calculate(24.0, ndl).unwrap();
        let steps: Result<alloc::vec::Vec<_>> = within.collect();
        assert!(steps.unwrap().iter().all(|s| s.phase != Phase::DecoStop));

        let beyond = engine.calculate(24.0, ndl + 1.0).unwrap();
        let steps: Result<alloc::vec::Vec<_>> = beyond.collect();
        assert!(steps.unwrap().iter().any(|s| s.phase == Phase::DecoStop));
    }

    #[test]
    fn test_ndl_rejects_bad_depth() {
        let engine = air_engine();
        assert!(engine.ndl(0.0).is_err());
    }
}
