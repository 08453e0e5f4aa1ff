//! Buhlmann ZH-L16 decompression engine with gradient factors.
//!
//! Configure an [`Engine`] with gas mixes, calculate a dive and iterate the
//! resulting [`DiveProfile`]; a [`DecoTable`] observing the profile
//! collects the decompression stops.
//!
//! ```no_run
//! use dive_deco_engine::{Engine, EngineConfig};
//!
//! let mut engine = Engine::new(EngineConfig::default())?;
//! engine.add_gas(0, 21, 0)?;
//! engine.add_gas(22, 50, 0)?;
//!
//! let mut table = engine.deco_table();
//! engine.calculate(40.0, 35.0)?.observe(&mut table).run()?;
//! for stop in table.stops() {
//!     println!("{}m {}min", stop.depth, stop.time);
//! }
//! # Ok::<(), dive_deco_engine::DecoError>(())
//! ```
#![no_std]

extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod ascent;
pub mod ceiling;
pub mod config;
pub mod deco;
pub mod engine;
pub mod error;
pub mod gas;
pub mod model;
pub mod ndl;
pub mod profile;
pub mod search;
pub mod simulate;
pub mod step;
pub mod table;
pub mod tissue;
pub mod units;
pub mod validate;
pub mod zhl16;

pub use config::{EngineConfig, SearchStrategy};
pub use engine::Engine;
pub use error::{ConfigError, DecoError, InvariantViolation, Result};
pub use gas::{GasList, GasMix};
pub use model::{DecoModel, DecoState, ModelVariant, ZhL16Gf};
pub use profile::{Broadcast, DiveProfile, StepObserver};
pub use step::{DiveStep, Phase};
pub use table::{DecoStop, DecoTable};
pub use tissue::{Tissue, TissueState};
pub use units::Units;
pub use validate::ProfileValidator;
