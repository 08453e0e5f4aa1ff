//! Decompression engine: configuration, gas mixes and dive step
//! transitions.

use crate::config::EngineConfig;
use crate::error::{ConfigError, DecoError, Result};
use crate::gas::{GasList, GasMix};
use crate::model::{DecoModel, DecoState, ZhL16Gf};
use crate::profile::DiveProfile;
use crate::step::{DiveStep, Phase};
use crate::table::DecoTable;
use crate::validate::ProfileValidator;
use crate::units::{depth_to_time, time_to_pressure, Units, METER_TO_BAR};

/// Decompression engine.
///
/// Gas mixes and parameters are set up front, then [`Engine::calculate`]
/// produces the dive profile. The profile borrows the engine, so the
/// configuration cannot change while a profile is being traversed.
#[derive(Debug, Clone)]
pub struct Engine<M = ZhL16Gf> {
    pub(crate) config: EngineConfig,
    pub(crate) model: M,
    pub(crate) gases: GasList,
    pub(crate) units: Units,
}

impl Engine<ZhL16Gf> {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let model = ZhL16Gf::new(config.model, config.gf_low, config.gf_high);
        Engine::with_model(config, model)
    }
}

impl Default for Engine<ZhL16Gf> {
    fn default() -> Self {
        let config = EngineConfig::default();
        Engine {
            model: ZhL16Gf::new(config.model, config.gf_low, config.gf_high),
            gases: GasList::new(),
            units: Units::new(config.surface_pressure),
            config,
        }
    }
}

impl<M: DecoModel> Engine<M> {
    /// Engine driving a custom model. Gradient factors come from the model,
    /// the configured ones only take part in validation.
    pub fn with_model(config: EngineConfig, model: M) -> Result<Self> {
        config.validate()?;
        Ok(Engine {
            units: Units::new(config.surface_pressure),
            config,
            model,
            gases: GasList::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn gases(&self) -> &GasList {
        &self.gases
    }

    /// Add a bottom or decompression gas mix switched to at `depth` meters.
    pub fn add_gas(&mut self, depth: u32, o2: u8, he: u8) -> Result<()> {
        self.gases.add(GasMix::new(depth, o2, he)?, false);
        Ok(())
    }

    /// Add a gas mix used on descent only.
    pub fn add_travel_gas(&mut self, depth: u32, o2: u8, he: u8) -> Result<()> {
        self.gases.add(GasMix::new(depth, o2, he)?, true);
        Ok(())
    }

    pub fn clear_gases(&mut self) {
        self.gases.clear();
    }

    /// Empty decompression table for profiles of this engine.
    pub fn deco_table(&self) -> DecoTable {
        DecoTable::new(self.units)
    }

    /// Validator checking profiles of this engine against its model.
    pub fn validator(&self) -> ProfileValidator<'_, M> {
        ProfileValidator::new(&self.model, self.units)
    }

    /// Dive profile for a dive to `depth` meters lasting `bottom_time`
    /// minutes, descent included.
    ///
    /// Steps are computed lazily while the profile is iterated.
    pub fn calculate(&self, depth: f64, bottom_time: f64) -> Result<DiveProfile<'_, M>> {
        if !(depth > 0.0) {
            return Err(ConfigError::Depth(depth).into());
        }
        self.gases.validate(depth)?;

        let descent_time = depth_to_time(depth, self.config.descent_rate);
        let bottom_time = bottom_time * 60.0;
        if bottom_time <= descent_time {
            return Err(DecoError::DivePlan {
                bottom_time,
                descent_time,
            });
        }

        tracing::debug!(depth, bottom_time, descent_time, "calculating dive profile");
        Ok(DiveProfile::new(self, depth, bottom_time - descent_time))
    }

    pub(crate) fn step_start(&self, gas: GasMix) -> DiveStep {
        let state = self.model.init(self.units.surface_pressure);
        DiveStep::start(self.units.surface_pressure, gas, state)
    }

    /// Stay at the depth of `step` for `time` seconds.
    pub(crate) fn step_const(&self, step: &DiveStep, time: f64, gas: &GasMix, phase: Phase) -> DiveStep {
        let state = self.model.load(step.abs_p, time, gas, 0.0, &step.state);
        step.next(phase, step.abs_p, step.time + time, *gas, state)
    }

    pub(crate) fn step_descent(&self, step: &DiveStep, time: f64, gas: &GasMix) -> DiveStep {
        let rate = self.config.descent_rate * METER_TO_BAR;
        let state = self.model.load(step.abs_p, time, gas, rate, &step.state);
        let abs_p = step.abs_p + time_to_pressure(time, self.config.descent_rate);
        step.next(Phase::Descent, abs_p, step.time + time, *gas, state)
    }

    /// Ascend from `step` for `time` seconds, optionally carrying a new
    /// gradient factor into the tissue state.
    pub(crate) fn step_ascent(
        &self,
        step: &DiveStep,
        time: f64,
        gas: &GasMix,
        gf: Option<f64>,
    ) -> DiveStep {
        let (abs_p, mut state) = self.ascend(step.abs_p, time, gas, &step.state);
        if let Some(gf) = gf {
            state = state.with_gf(gf);
        }
        step.next(Phase::Ascent, abs_p, step.time + time, *gas, state)
    }

    fn ascend(&self, abs_p: f64, time: f64, gas: &GasMix, state: &DecoState) -> (f64, DecoState) {
        let rate = -self.config.ascent_rate * METER_TO_BAR;
        let state = self.model.load(abs_p, time, gas, rate, state);
        (abs_p - time_to_pressure(time, self.config.ascent_rate), state)
    }

    /// Ascent invariant: ambient pressure stays at or below the ceiling
    /// limit of the state gradient factor.
    pub(crate) fn inv_limit(&self, abs_p: f64, state: &DecoState) -> bool {
        abs_p >= self.model.ceiling_limit(state, None)
    }

    /// Whether the pressure reached after ascending from `abs_p` for `time`
    /// seconds is at or below the ceiling of `state` at gradient factor
    /// `gf`. The state is taken as is, no loading during the ascent.
    pub(crate) fn can_ascend(&self, abs_p: f64, time: f64, state: &DecoState, gf: f64) -> bool {
        abs_p - time_to_pressure(time, self.config.ascent_rate) >= self.model.ceiling_limit(state, Some(gf))
    }
}
