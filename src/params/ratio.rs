//! Compression ratio choices
//!
//! Ratios come from a fixed list of host choices rather than a free scalar.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TribandError};

/// Compression ratio, one of the fourteen host choices
///
/// Serialized as its numeric value (`3.0` for 3:1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub enum Ratio {
    OneToOne,
    OnePointFive,
    Two,
    #[default]
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Ten,
    Fifteen,
    Twenty,
    Fifty,
    Hundred,
}

impl Ratio {
    /// Every choice, in host order
    pub const ALL: [Ratio; 14] = [
        Ratio::OneToOne,
        Ratio::OnePointFive,
        Ratio::Two,
        Ratio::Three,
        Ratio::Four,
        Ratio::Five,
        Ratio::Six,
        Ratio::Seven,
        Ratio::Eight,
        Ratio::Ten,
        Ratio::Fifteen,
        Ratio::Twenty,
        Ratio::Fifty,
        Ratio::Hundred,
    ];

    /// Numeric ratio (input dB over threshold per output dB)
    pub fn value(self) -> f32 {
        match self {
            Ratio::OneToOne => 1.0,
            Ratio::OnePointFive => 1.5,
            Ratio::Two => 2.0,
            Ratio::Three => 3.0,
            Ratio::Four => 4.0,
            Ratio::Five => 5.0,
            Ratio::Six => 6.0,
            Ratio::Seven => 7.0,
            Ratio::Eight => 8.0,
            Ratio::Ten => 10.0,
            Ratio::Fifteen => 15.0,
            Ratio::Twenty => 20.0,
            Ratio::Fifty => 50.0,
            Ratio::Hundred => 100.0,
        }
    }

    /// Position in the host choice list
    pub fn index(self) -> usize {
        self as usize
    }

    /// Choice at a host list position
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Exact choice for a numeric ratio
    pub fn from_value(value: f32) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| (r.value() - value).abs() < 1e-3)
    }

    /// Display name used by hosts, one decimal place ("1.5", "3.0")
    pub fn choice_name(self) -> String {
        format!("{:.1}", self.value())
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:1", self.value())
    }
}

impl FromStr for Ratio {
    type Err = TribandError;

    /// Accepts "3", "3.0" or "3:1"
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let number = trimmed.strip_suffix(":1").unwrap_or(trimmed);
        number
            .parse::<f32>()
            .ok()
            .and_then(Ratio::from_value)
            .ok_or_else(|| TribandError::InvalidRatio {
                value: s.to_string(),
            })
    }
}

impl TryFrom<f32> for Ratio {
    type Error = TribandError;

    fn try_from(value: f32) -> Result<Self> {
        Ratio::from_value(value).ok_or(TribandError::InvalidRatio {
            value: value.to_string(),
        })
    }
}

impl From<Ratio> for f32 {
    fn from(ratio: Ratio) -> f32 {
        ratio.value()
    }
}
