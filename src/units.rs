//! Depth, pressure and time conversions.

use libm::{fabs, round};

/// Pressure of one meter of sea water, bar.
pub const METER_TO_BAR: f64 = 0.09985;

/// Alveolar water vapour pressure at 37 degrees Celsius, bar.
pub const WATER_VAPOUR_PRESSURE: f64 = 0.0627;

/// Standard sea level surface pressure, bar.
pub const SURFACE_PRESSURE: f64 = 1.01325;

/// Distance between two decompression stops, meters.
pub const DECO_STOP_INTERVAL: f64 = 3.0;

pub const EPSILON: f64 = 1e-10;

/// Round `value` to `decimals` decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = libm::pow(10.0, decimals as f64);
    round(value * scale) / scale
}

/// Depth/pressure conversion anchored at a surface pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Units {
    pub surface_pressure: f64,
}

impl Units {
    pub fn new(surface_pressure: f64) -> Self {
        Units { surface_pressure }
    }

    /// Absolute pressure at `depth` meters.
    pub fn to_pressure(&self, depth: f64) -> f64 {
        depth * METER_TO_BAR + self.surface_pressure
    }

    /// Depth of absolute pressure `abs_p`, rounded to absorb float drift.
    pub fn to_depth(&self, abs_p: f64) -> f64 {
        round_to((abs_p - self.surface_pressure) / METER_TO_BAR, 10)
    }

    pub fn at_surface(&self, abs_p: f64) -> bool {
        fabs(abs_p - self.surface_pressure) < EPSILON
    }

    /// Pressure of one decompression stop interval.
    pub fn stop_interval_pressure(&self) -> f64 {
        DECO_STOP_INTERVAL * METER_TO_BAR
    }
}

/// Seconds needed to change pressure by `pressure` at `rate` m/min.
pub fn pressure_to_time(pressure: f64, rate: f64) -> f64 {
    pressure / rate / METER_TO_BAR * 60.0
}

/// Pressure change after `time` seconds at `rate` m/min.
pub fn time_to_pressure(time: f64, rate: f64) -> f64 {
    time * rate * METER_TO_BAR / 60.0
}

/// Seconds needed to travel `depth` meters at `rate` m/min.
pub fn depth_to_time(depth: f64, rate: f64) -> f64 {
    depth / rate * 60.0
}

/// Whether `depth` sits on the decompression stop grid.
pub fn on_stop_grid(depth: f64) -> bool {
    let k = round(depth / DECO_STOP_INTERVAL);
    fabs(depth - k * DECO_STOP_INTERVAL) < 1e-6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_round_trip() {
        let units = Units::new(1.0132);
        for depth in [0.0, 3.0, 18.0, 21.0, 35.0, 99.0] {
            assert_eq!(units.to_depth(units.to_pressure(depth)), depth);
        }
    }

    #[test]
    fn test_time_conversions() {
        assert_eq!(depth_to_time(35.0, 20.0), 105.0);
        let p = time_to_pressure(18.0, 10.0);
        assert!(fabs(pressure_to_time(p, 10.0) - 18.0) < 1e-9);
        assert!(fabs(p - 3.0 * METER_TO_BAR) < 1e-12);
    }

    #[test]
    fn test_stop_grid() {
        assert!(on_stop_grid(0.0));
        assert!(on_stop_grid(21.0));
        assert!(on_stop_grid(17.999999999));
        assert!(!on_stop_grid(22.0));
        assert!(!on_stop_grid(35.0));
    }
}
