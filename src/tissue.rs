#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use libm::{exp, log};

use crate::units::WATER_VAPOUR_PRESSURE;
use crate::zhl16::NUM_COMPARTMENTS;

/// Inert gas partial pressures of one tissue compartment, bar.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tissue {
    pub load_n2: f64,
    pub load_he: f64,
}

pub type TissueState = [Tissue; NUM_COMPARTMENTS];

// pt(t) = palv0 + R(t - 1/k) - [palv0 - pt0 - R/k] * e^(-kt)
// pt(t) -> partial pressure of the gas in the tissue at time t
// pt0 -> initial partial pressure of the gas in the tissue at t=0
// palv0 -> initial alveolar partial pressure of the gas in the mix at t=0
// k -> tissue time constant, ln2 / half life
// R -> rate of change of the inert gas alveolar partial pressure (bar/min)
//      R = Q * Ramb where Q is the inert gas fraction and Ramb the ambient pressure rate
// t -> time, minutes
#[inline]
pub fn schreiner(
    abs_p: f64,
    seconds: f64,
    fraction: f64,
    rate: f64,
    pressure: f64,
    half_life: f64,
) -> f64 {
    let palv = fraction * (abs_p - WATER_VAPOUR_PRESSURE);
    let t = seconds / 60.0;
    let k = log(2.0) / half_life;
    let r = fraction * rate;
    palv + r * (t - 1.0 / k) - (palv - pressure - r / k) * exp(-k * t)
}

/// Load both inert gases of one compartment for `seconds` seconds.
///
/// `rate` is the ambient pressure change in bar/min, negative on ascent.
pub fn calculate_tissue(
    tissue: Tissue,
    half_life_n2: f64,
    half_life_he: f64,
    abs_p: f64,
    seconds: f64,
    fn2: f64,
    fhe: f64,
    rate: f64,
) -> Tissue {
    Tissue {
        load_n2: schreiner(abs_p, seconds, fn2, rate, tissue.load_n2, half_life_n2),
        load_he: schreiner(abs_p, seconds, fhe, rate, tissue.load_he, half_life_he),
    }
}

#[test]
fn test_schreiner_constant_depth_saturates() {
    // 635 min compartment barely moves, 5 min compartment almost saturates
    let abs_p = 5.0;
    let palv = 0.79 * (abs_p - WATER_VAPOUR_PRESSURE);
    let fast = schreiner(abs_p, 60.0 * 60.0, 0.79, 0.0, 0.75, 5.0);
    let slow = schreiner(abs_p, 60.0 * 60.0, 0.79, 0.0, 0.75, 635.0);
    assert!(libm::fabs(fast - palv) < 1e-3);
    assert!(slow > 0.75 && slow < 1.0);
}

#[test]
fn test_schreiner_half_life() {
    let abs_p = 4.0;
    let palv = 0.79 * (abs_p - WATER_VAPOUR_PRESSURE);
    let p0 = 0.75;
    let result = schreiner(abs_p, 12.5 * 60.0, 0.79, 0.0, p0, 12.5);
    assert!(libm::fabs(result - (p0 + (palv - p0) / 2.0)) < 1e-12);
}
