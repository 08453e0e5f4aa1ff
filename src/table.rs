//! Decompression table built from the stops of a dive profile.

use alloc::vec::Vec;

use libm::ceil;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::profile::StepObserver;
use crate::step::{DiveStep, Phase};
use crate::units::{round_to, Units};

/// Decompression stop summary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoStop {
    /// meters
    pub depth: u32,
    /// minutes
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct StopWindow {
    depth: f64,
    entry: f64,
    exit: f64,
}

/// Collects decompression stops from a profile.
///
/// Register it with [`DiveProfile::observe`](crate::DiveProfile::observe)
/// and read the stops once the profile is exhausted.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoTable {
    units: Units,
    windows: Vec<StopWindow>,
}

impl DecoTable {
    pub fn new(units: Units) -> Self {
        DecoTable {
            units,
            windows: Vec::new(),
        }
    }

    /// Stops in the order they were made, zero minute stops excluded.
    pub fn stops(&self) -> Vec<DecoStop> {
        self.windows
            .iter()
            .map(|w| DecoStop {
                depth: libm::round(w.depth) as u32,
                time: ceil(round_to((w.exit - w.entry) / 60.0, 6)) as u32,
            })
            .filter(|s| s.time > 0)
            .collect()
    }

    /// Total decompression time, minutes.
    pub fn total(&self) -> u32 {
        self.stops().iter().map(|s| s.time).sum()
    }

    /// First stop, if any.
    pub fn first(&self) -> Option<DecoStop> {
        self.stops().first().copied()
    }

    /// Last stop, if any.
    pub fn last(&self) -> Option<DecoStop> {
        self.stops().last().copied()
    }

    fn push(&mut self, step: &DiveStep, history: &[DiveStep]) {
        let depth = self.units.to_depth(step.abs_p);
        let existing = self
            .windows
            .iter_mut()
            .find(|w| libm::fabs(w.depth - depth) < 1e-6);
        match existing {
            Some(window) => window.exit = step.time,
            None => {
                let entry = step
                    .prev
                    .and_then(|i| history.get(i))
                    .map_or(step.time, |prev| prev.time);
                self.windows.push(StopWindow {
                    depth,
                    entry,
                    exit: step.time,
                });
            }
        }
    }
}

impl StepObserver for DecoTable {
    fn observe(&mut self, step: &DiveStep, history: &[DiveStep]) -> Result<()> {
        if step.phase == Phase::DecoStop {
            self.push(step, history);
        }
        Ok(())
    }
}
