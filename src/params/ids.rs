//! Host parameter table
//!
//! Names, ranges and defaults for the 25 automatable parameters. The names
//! match what hosts store in saved sessions.

use std::fmt;

use super::band::Band;
use super::ratio::Ratio;

/// Continuous parameter range with step quantization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32, step: f32, default: f32) -> Self {
        Self {
            min,
            max,
            step,
            default,
        }
    }

    /// Whether `value` lies inside the range (inclusive)
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Force into range and onto the step grid
    pub fn snap(&self, value: f32) -> f32 {
        let clamped = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return clamped;
        }
        let steps = ((clamped - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }

    /// Human readable range for error messages
    pub fn describe(&self, unit: &str) -> String {
        format!("{} to {} {}", self.min, self.max, unit)
    }
}

pub const GAIN_RANGE: ParamRange = ParamRange::new(-24.0, 24.0, 0.5, 0.0);
pub const THRESHOLD_RANGE: ParamRange = ParamRange::new(-60.0, 12.0, 1.0, 0.0);
pub const ATTACK_RANGE: ParamRange = ParamRange::new(5.0, 500.0, 1.0, 50.0);
pub const RELEASE_RANGE: ParamRange = ParamRange::new(5.0, 500.0, 1.0, 250.0);
pub const LOW_MID_CROSSOVER_RANGE: ParamRange = ParamRange::new(20.0, 999.0, 1.0, 400.0);
pub const MID_HIGH_CROSSOVER_RANGE: ParamRange = ParamRange::new(1000.0, 2000.0, 1.0, 2000.0);

/// Value kind a parameter carries
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    /// Continuous value with range and unit
    Float(ParamRange, &'static str),
    /// Ratio choice list
    Choice,
    /// On/off switch
    Bool,
}

/// Identifier for one host parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    LowMidCrossoverFreq,
    MidHighCrossoverFreq,
    Threshold(Band),
    Attack(Band),
    Release(Band),
    Ratio(Band),
    Bypassed(Band),
    Mute(Band),
    Solo(Band),
    InputGain,
    OutputGain,
}

impl ParamId {
    /// Every parameter, in host registration order
    pub fn all() -> Vec<ParamId> {
        let mut ids = vec![ParamId::LowMidCrossoverFreq, ParamId::MidHighCrossoverFreq];
        let per_band: [fn(Band) -> ParamId; 7] = [
            ParamId::Threshold,
            ParamId::Attack,
            ParamId::Release,
            ParamId::Ratio,
            ParamId::Bypassed,
            ParamId::Mute,
            ParamId::Solo,
        ];
        for make in per_band {
            ids.extend(Band::ALL.iter().map(|&band| make(band)));
        }
        ids.push(ParamId::InputGain);
        ids.push(ParamId::OutputGain);
        ids
    }

    /// Host-facing name, e.g. "Threshold Low Band"
    pub fn name(&self) -> String {
        match self {
            ParamId::LowMidCrossoverFreq => "Low Mid Crossover Freq".to_string(),
            ParamId::MidHighCrossoverFreq => "Mid High Crossover Freq".to_string(),
            ParamId::Threshold(b) => format!("Threshold {} Band", b.name()),
            ParamId::Attack(b) => format!("Attack {} Band", b.name()),
            ParamId::Release(b) => format!("Release {} Band", b.name()),
            ParamId::Ratio(b) => format!("Ratio {} Band", b.name()),
            ParamId::Bypassed(b) => format!("Bypassed {} Band", b.name()),
            ParamId::Mute(b) => format!("Mute {} Band", b.name()),
            ParamId::Solo(b) => format!("Solo {} Band", b.name()),
            ParamId::InputGain => "Input Gain".to_string(),
            ParamId::OutputGain => "Output Gain".to_string(),
        }
    }

    /// Look up a parameter by host name
    pub fn from_name(name: &str) -> Option<ParamId> {
        ParamId::all().into_iter().find(|id| id.name() == name)
    }

    /// Value kind, range and unit
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamId::LowMidCrossoverFreq => ParamKind::Float(LOW_MID_CROSSOVER_RANGE, "Hz"),
            ParamId::MidHighCrossoverFreq => ParamKind::Float(MID_HIGH_CROSSOVER_RANGE, "Hz"),
            ParamId::Threshold(_) => ParamKind::Float(THRESHOLD_RANGE, "dB"),
            ParamId::Attack(_) => ParamKind::Float(ATTACK_RANGE, "ms"),
            ParamId::Release(_) => ParamKind::Float(RELEASE_RANGE, "ms"),
            ParamId::InputGain | ParamId::OutputGain => ParamKind::Float(GAIN_RANGE, "dB"),
            ParamId::Ratio(_) => ParamKind::Choice,
            ParamId::Bypassed(_) | ParamId::Mute(_) | ParamId::Solo(_) => ParamKind::Bool,
        }
    }

    /// Default value rendered for listings
    pub fn default_display(&self) -> String {
        match self.kind() {
            ParamKind::Float(range, unit) => format!("{} {}", range.default, unit),
            ParamKind::Choice => Ratio::default().choice_name(),
            ParamKind::Bool => "off".to_string(),
        }
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
