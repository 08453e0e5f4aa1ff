//! Decompression model: tissue loading and ascent ceiling.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ceiling::max_ceiling;
use crate::gas::GasMix;
use crate::tissue::{calculate_tissue, Tissue, TissueState};
use crate::units::WATER_VAPOUR_PRESSURE;
use crate::zhl16::{CoefficientTable, NUM_COMPARTMENTS, ZHL16B, ZHL16C};

/// Nitrogen fraction of air the tissues are saturated with before a dive.
pub const START_FN2: f64 = 0.7902;

/// Tissue loading together with the gradient factor currently permitted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoState {
    pub tissues: TissueState,
    pub gf: f64,
}

impl DecoState {
    pub fn with_gf(self, gf: f64) -> Self {
        DecoState { gf, ..self }
    }
}

/// Physics the engine drives. Alternative numeric or tabulated back ends
/// implement this trait.
pub trait DecoModel {
    fn gf_low(&self) -> f64;

    fn gf_high(&self) -> f64;

    /// Tissues saturated at surface pressure, gradient factor at `gf_low`.
    fn init(&self, surface_pressure: f64) -> DecoState;

    /// Load tissues for `time` seconds starting at `abs_p`, with ambient
    /// pressure changing at `rate` bar/min.
    ///
    /// Panics unless `time > 0`.
    fn load(&self, abs_p: f64, time: f64, gas: &GasMix, rate: f64, state: &DecoState)
    -> DecoState;

    /// Highest tolerated ambient pressure over all compartments. Uses the
    /// state gradient factor unless `gf` is given.
    fn ceiling_limit(&self, state: &DecoState, gf: Option<f64>) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModelVariant {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "ZH-L16B-GF"))]
    ZhL16B,
    #[cfg_attr(feature = "serde", serde(rename = "ZH-L16C-GF"))]
    ZhL16C,
}

impl ModelVariant {
    pub fn table(&self) -> &'static CoefficientTable {
        match self {
            ModelVariant::ZhL16B => &ZHL16B,
            ModelVariant::ZhL16C => &ZHL16C,
        }
    }
}

/// ZH-L16 model with gradient factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZhL16Gf {
    table: &'static CoefficientTable,
    gf_low: f64,
    gf_high: f64,
}

impl ZhL16Gf {
    pub fn new(variant: ModelVariant, gf_low: f64, gf_high: f64) -> Self {
        ZhL16Gf {
            table: variant.table(),
            gf_low,
            gf_high,
        }
    }

    pub fn table(&self) -> &'static CoefficientTable {
        self.table
    }

    /// Leading compartment for the ceiling at `gf`.
    pub fn leading_compartment(&self, state: &DecoState, gf: f64) -> usize {
        max_ceiling(self.table, gf, &state.tissues).1
    }
}

impl Default for ZhL16Gf {
    fn default() -> Self {
        ZhL16Gf::new(ModelVariant::ZhL16B, 0.3, 0.85)
    }
}

impl DecoModel for ZhL16Gf {
    fn gf_low(&self) -> f64 {
        self.gf_low
    }

    fn gf_high(&self) -> f64 {
        self.gf_high
    }

    fn init(&self, surface_pressure: f64) -> DecoState {
        let tissue = Tissue {
            load_n2: START_FN2 * (surface_pressure - WATER_VAPOUR_PRESSURE),
            load_he: 0.0,
        };
        DecoState {
            tissues: [tissue; NUM_COMPARTMENTS],
            gf: self.gf_low,
        }
    }

    fn load(
        &self,
        abs_p: f64,
        time: f64,
        gas: &GasMix,
        rate: f64,
        state: &DecoState,
    ) -> DecoState {
        assert!(time > 0.0, "tissue loading over {}s", time);
        let (fn2, fhe) = (gas.fn2(), gas.fhe());
        let mut tissues = state.tissues;
        for (i, tissue) in tissues.iter_mut().enumerate() {
            *tissue = calculate_tissue(
                *tissue,
                self.table.n2_half_life[i],
                self.table.he_half_life[i],
                abs_p,
                time,
                fn2,
                fhe,
                rate,
            );
        }
        DecoState {
            tissues,
            gf: state.gf,
        }
    }

    fn ceiling_limit(&self, state: &DecoState, gf: Option<f64>) -> f64 {
        let gf = gf.unwrap_or(state.gf);
        max_ceiling(self.table, gf, &state.tissues).0
    }
}
