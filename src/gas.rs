//! Breathing gas mixes and gas list validation.

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::units::DECO_STOP_INTERVAL;

/// Breathing gas mix with its switch depth.
///
/// Percentages always add up to 100, nitrogen makes up the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GasMix {
    /// switch depth, meters
    pub depth: u32,
    pub o2: u8,
    pub n2: u8,
    pub he: u8,
}

impl GasMix {
    pub fn new(depth: u32, o2: u8, he: u8) -> Result<Self, ConfigError> {
        if o2 == 0 || o2 as u16 + he as u16 > 100 {
            return Err(ConfigError::InvalidGasMix { o2, he });
        }
        Ok(GasMix {
            depth,
            o2,
            n2: 100 - o2 - he,
            he,
        })
    }

    pub fn air() -> Self {
        GasMix {
            depth: 0,
            o2: 21,
            n2: 79,
            he: 0,
        }
    }

    pub fn fn2(&self) -> f64 {
        self.n2 as f64 / 100.0
    }

    pub fn fhe(&self) -> f64 {
        self.he as f64 / 100.0
    }

    /// Switch depth rounded up to the stop grid, i.e. 22m -> 24m.
    pub(crate) fn depth_ceil(&self) -> u32 {
        let interval = DECO_STOP_INTERVAL as u32;
        self.depth.div_ceil(interval) * interval
    }

    /// Switch depth rounded down to the stop grid, i.e. 22m -> 21m.
    pub(crate) fn depth_floor(&self) -> u32 {
        let interval = DECO_STOP_INTERVAL as u32;
        self.depth / interval * interval
    }
}

/// Gas mixes configured for a dive.
///
/// The first non-travel gas is the bottom gas, every later one is a
/// decompression gas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GasList {
    travel: Vec<GasMix>,
    mixes: Vec<GasMix>,
}

impl GasList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, gas: GasMix, travel: bool) {
        if travel {
            self.travel.push(gas);
        } else {
            self.mixes.push(gas);
        }
    }

    pub fn clear(&mut self) {
        self.travel.clear();
        self.mixes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.travel.is_empty() && self.mixes.is_empty()
    }

    pub fn bottom(&self) -> Option<&GasMix> {
        self.mixes.first()
    }

    pub fn travel(&self) -> &[GasMix] {
        &self.travel
    }

    pub fn deco(&self) -> &[GasMix] {
        self.mixes.get(1..).unwrap_or(&[])
    }

    /// Check the gas list against a planned maximum depth.
    pub fn validate(&self, max_depth: f64) -> Result<(), ConfigError> {
        if self.is_empty() {
            return Err(ConfigError::NoGas);
        }
        let bottom = self.bottom().ok_or(ConfigError::NoBottomGas)?;

        if self.travel.is_empty() && bottom.depth != 0 {
            return Err(ConfigError::BottomGasNotAtSurface {
                depth: bottom.depth,
            });
        }

        if let Some(depth) = first_duplicate_depth(&self.travel) {
            return Err(ConfigError::DuplicateTravelGasDepth { depth });
        }
        if let Some(depth) = first_duplicate_depth(self.deco()) {
            return Err(ConfigError::DuplicateDecoGasDepth { depth });
        }
        if self.deco().iter().any(|m| m.depth == 0) {
            return Err(ConfigError::DecoGasAtSurface);
        }

        let too_deep = self
            .travel
            .iter()
            .chain(self.mixes.iter())
            .find(|m| m.depth as f64 > max_depth);
        if let Some(m) = too_deep {
            return Err(ConfigError::GasDeeperThanDive {
                depth: m.depth,
                max_depth,
            });
        }

        Ok(())
    }

    /// Travel gases by switch depth followed by the bottom gas.
    pub(crate) fn descent_mixes(&self) -> Vec<GasMix> {
        let mut mixes = self.travel.clone();
        mixes.sort_by_key(|m| m.depth);
        mixes.extend(self.bottom().copied());
        mixes
    }

    /// Bottom gas followed by decompression gases, deepest switch first.
    pub(crate) fn ascent_mixes(&self) -> Vec<GasMix> {
        let mut deco = self.deco().to_vec();
        deco.sort_by(|a, b| b.depth.cmp(&a.depth));
        let mut mixes = Vec::with_capacity(deco.len() + 1);
        mixes.extend(self.bottom().copied());
        mixes.extend(deco);
        mixes
    }
}

fn first_duplicate_depth(mixes: &[GasMix]) -> Option<u32> {
    mixes
        .iter()
        .enumerate()
        .find(|(i, m)| mixes[i + 1..].iter().any(|o| o.depth == m.depth))
        .map(|(_, m)| m.depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gas_mix_balance() {
        let mix = GasMix::new(0, 21, 35).unwrap();
        assert_eq!(mix.n2, 44);
        assert_eq!(mix.fhe(), 0.35);
        assert_eq!(
            GasMix::new(0, 80, 30),
            Err(ConfigError::InvalidGasMix { o2: 80, he: 30 })
        );
    }

    #[test]
    fn test_switch_depth_rounding() {
        let ean50 = GasMix::new(22, 50, 0).unwrap();
        assert_eq!(ean50.depth_ceil(), 24);
        assert_eq!(ean50.depth_floor(), 21);

        let o2 = GasMix::new(6, 100, 0).unwrap();
        assert_eq!(o2.depth_ceil(), 6);
        assert_eq!(o2.depth_floor(), 6);
    }

    #[test]
    fn test_ascent_mixes_order() {
        let mut gases = GasList::new();
        gases.add(GasMix::new(0, 21, 0).unwrap(), false);
        gases.add(GasMix::new(6, 100, 0).unwrap(), false);
        gases.add(GasMix::new(22, 50, 0).unwrap(), false);
        gases.add(GasMix::new(0, 36, 0).unwrap(), true);

        let depths: Vec<u32> = gases.ascent_mixes().iter().map(|m| m.depth).collect();
        assert_eq!(depths, [0, 22, 6]);

        let descent = gases.descent_mixes();
        assert_eq!(descent.len(), 2);
        assert_eq!(descent[0].o2, 36);
        assert_eq!(descent[1].o2, 21);
    }
}
