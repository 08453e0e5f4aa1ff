#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::gas::GasMix;
use crate::model::DecoState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Start,
    Descent,
    Const,
    Ascent,
    DecoStop,
    GasSwitch,
}

/// One node of the dive history.
///
/// Steps are values; `index` is the position in the profile history and
/// `prev` the position of the step this one was computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DiveStep {
    pub index: usize,
    pub prev: Option<usize>,
    pub phase: Phase,
    /// absolute pressure, bar
    pub abs_p: f64,
    /// seconds since dive start
    pub time: f64,
    pub gas: GasMix,
    pub state: DecoState,
}

impl DiveStep {
    pub(crate) fn start(abs_p: f64, gas: GasMix, state: DecoState) -> Self {
        DiveStep {
            index: 0,
            prev: None,
            phase: Phase::Start,
            abs_p,
            time: 0.0,
            gas,
            state,
        }
    }

    /// Step following `self`.
    pub(crate) fn next(
        &self,
        phase: Phase,
        abs_p: f64,
        time: f64,
        gas: GasMix,
        state: DecoState,
    ) -> Self {
        DiveStep {
            index: self.index + 1,
            prev: Some(self.index),
            phase,
            abs_p,
            time,
            gas,
            state,
        }
    }

    /// Gas switch in place, everything but the gas carried over.
    pub(crate) fn switch_gas(&self, gas: GasMix) -> Self {
        self.next(Phase::GasSwitch, self.abs_p, self.time, gas, self.state)
    }

    pub fn gf(&self) -> f64 {
        self.state.gf
    }
}
