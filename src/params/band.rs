//! Band identity and per-band control state

use serde::{Deserialize, Serialize};

use super::ratio::Ratio;

/// One of the three fixed bands, indexed low=0, mid=1, high=2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Low,
    Mid,
    High,
}

impl Band {
    /// Number of bands
    pub const COUNT: usize = 3;

    /// All bands in index order
    pub const ALL: [Band; 3] = [Band::Low, Band::Mid, Band::High];

    /// Array index for this band
    pub fn index(self) -> usize {
        self as usize
    }

    /// Band for an array index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Name as it appears in host parameter names
    pub fn name(self) -> &'static str {
        match self {
            Band::Low => "Low",
            Band::Mid => "Mid",
            Band::High => "High",
        }
    }
}

/// Control values for one band, read once per block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandState {
    /// Attack time in milliseconds (5 to 500)
    pub attack_ms: f32,
    /// Release time in milliseconds (5 to 500)
    pub release_ms: f32,
    /// Threshold in dB (-60 to +12)
    pub threshold_db: f32,
    /// Compression ratio choice
    pub ratio: Ratio,
    /// Skip compression for this band (still filtered and mixed)
    pub bypassed: bool,
    /// Exclude from the mix unless some band is soloed
    pub muted: bool,
    /// Mix only soloed bands when any band is soloed
    pub soloed: bool,
}

impl Default for BandState {
    fn default() -> Self {
        Self {
            attack_ms: 50.0,
            release_ms: 250.0,
            threshold_db: 0.0,
            ratio: Ratio::default(),
            bypassed: false,
            muted: false,
            soloed: false,
        }
    }
}
