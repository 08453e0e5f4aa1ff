use thiserror::Error;

/// Result type alias using the crate error type
pub type Result<T> = core::result::Result<T, DecoError>;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecoError {
    /// Gas list or engine parameters rejected before any calculation
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Dive plan cannot be executed as requested
    #[error("dive plan error: bottom time {bottom_time}s does not exceed descent time {descent_time}s")]
    DivePlan { bottom_time: f64, descent_time: f64 },

    /// Produced profile violates the decompression model, always an engine bug
    #[error("model invariant violated: {0}")]
    ModelInvariant(#[from] InvariantViolation),
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    #[error("no gas mix configured")]
    NoGas,

    #[error("no bottom gas mix configured")]
    NoBottomGas,

    #[error("bottom gas switch depth must be 0m without travel gas, got {depth}m")]
    BottomGasNotAtSurface { depth: u32 },

    #[error("two travel gas mixes share switch depth {depth}m")]
    DuplicateTravelGasDepth { depth: u32 },

    #[error("two decompression gas mixes share switch depth {depth}m")]
    DuplicateDecoGasDepth { depth: u32 },

    #[error("decompression gas mix cannot switch at the surface")]
    DecoGasAtSurface,

    #[error("gas mix switch depth {depth}m is deeper than dive depth {max_depth}m")]
    GasDeeperThanDive { depth: u32, max_depth: f64 },

    #[error("invalid gas mix: {o2}% O2 and {he}% He")]
    InvalidGasMix { o2: u8, he: u8 },

    #[error("dive depth must be positive, got {0}m")]
    Depth(f64),

    #[error("gradient factors must satisfy 0 < low <= high <= 1, got {low}/{high}")]
    GradientFactors { low: f64, high: f64 },

    #[error("ascent and descent rates must be positive, got {ascent}/{descent} m/min")]
    Rate { ascent: f64, descent: f64 },

    #[error("surface pressure must be within 0.5-1.5 bar, got {0} bar")]
    SurfacePressure(f64),

    #[error("deco stop search time must be at least one minute")]
    SearchTime,

    #[error("malformed configuration at line {line}, column {column}")]
    Malformed { line: usize, column: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvariantViolation {
    #[error("step {index} at {abs_p} bar breaches ceiling {limit} bar")]
    CeilingBreached { index: usize, abs_p: f64, limit: f64 },

    #[error("deco stop at {depth}m is off the stop grid")]
    StopOffGrid { depth: f64 },

    #[error("deco stop at {depth}m lasts {duration}s, not a positive whole minute")]
    StopLength { depth: f64, duration: f64 },

    #[error("step {index} goes back in time")]
    TimeReversed { index: usize },

    #[error("step {index} rises above the surface")]
    AboveSurface { index: usize },

    #[error("deco stop at {depth}m does not clear within {minutes} minutes")]
    StopTooLong { depth: f64, minutes: u32 },
}
