//! Configuration Layer
//!
//! Maps host-facing named parameters onto the plain [`ControlSnapshot`] the
//! processor consumes each block. Validation, clamping and persistence live
//! here; the DSP core trusts whatever snapshot it is given.

mod band;
mod ids;
mod ratio;
mod snapshot;

pub use band::{Band, BandState};
pub use ids::{
    ParamId, ParamKind, ParamRange, ATTACK_RANGE, GAIN_RANGE, LOW_MID_CROSSOVER_RANGE,
    MID_HIGH_CROSSOVER_RANGE, RELEASE_RANGE, THRESHOLD_RANGE,
};
pub use ratio::Ratio;
pub use snapshot::ControlSnapshot;
