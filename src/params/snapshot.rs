//! Per-block control snapshot
//!
//! The configuration layer owns one of these, mutates it from host parameter
//! changes, and hands the processor a consistent copy for every block.

use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::band::{Band, BandState};
use super::ids::{ParamId, ParamKind, GAIN_RANGE, LOW_MID_CROSSOVER_RANGE, MID_HIGH_CROSSOVER_RANGE};
use super::ratio::Ratio;
use crate::error::{Result, TribandError};

/// Every control value the processor reads at the start of a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSnapshot {
    /// Input trim in dB (-24 to +24)
    pub input_gain_db: f32,
    /// Output trim in dB (-24 to +24)
    pub output_gain_db: f32,
    /// Low/mid split in Hz (20 to 999)
    pub low_mid_crossover_hz: f32,
    /// Mid/high split in Hz (1000 to 2000)
    pub mid_high_crossover_hz: f32,
    /// Low, mid and high band settings
    pub bands: [BandState; 3],
}

impl Default for ControlSnapshot {
    fn default() -> Self {
        Self {
            input_gain_db: GAIN_RANGE.default,
            output_gain_db: GAIN_RANGE.default,
            low_mid_crossover_hz: LOW_MID_CROSSOVER_RANGE.default,
            mid_high_crossover_hz: MID_HIGH_CROSSOVER_RANGE.default,
            bands: [BandState::default(); 3],
        }
    }
}

impl ControlSnapshot {
    /// Settings for one band
    pub fn band(&self, band: Band) -> &BandState {
        &self.bands[band.index()]
    }

    /// Mutable settings for one band
    pub fn band_mut(&mut self, band: Band) -> &mut BandState {
        &mut self.bands[band.index()]
    }

    /// True when any band is soloed
    pub fn any_soloed(&self) -> bool {
        self.bands.iter().any(|b| b.soloed)
    }

    /// Check the crossover ordering, then every value against its range
    pub fn validate(&self) -> Result<()> {
        if self.low_mid_crossover_hz >= self.mid_high_crossover_hz {
            return Err(TribandError::CrossoverOrder {
                low_mid_hz: self.low_mid_crossover_hz,
                mid_high_hz: self.mid_high_crossover_hz,
            });
        }
        for id in ParamId::all() {
            if let (ParamKind::Float(range, unit), Some(value)) = (id.kind(), self.float_value(id))
            {
                if !range.contains(value) {
                    return Err(TribandError::InvalidParameter {
                        param: id.name(),
                        value: value.to_string(),
                        expected: range.describe(unit),
                    });
                }
            }
        }
        Ok(())
    }

    /// Force every continuous value into range and onto its step grid
    ///
    /// The disjoint crossover ranges keep the ordering intact once clamped.
    pub fn clamp(&mut self) {
        for id in ParamId::all() {
            if let ParamKind::Float(range, _) = id.kind() {
                if let Some(slot) = self.float_slot(id) {
                    let snapped = range.snap(*slot);
                    if snapped != *slot {
                        warn!("{} clamped from {} to {}", id, *slot, snapped);
                        *slot = snapped;
                    }
                }
            }
        }
    }

    /// Apply one host parameter change by name
    ///
    /// Continuous values must already be in range; ratios accept a number
    /// or a choice name; switches accept booleans.
    pub fn set_param(&mut self, name: &str, value: &Value) -> Result<()> {
        let id = ParamId::from_name(name).ok_or_else(|| TribandError::UnknownParameter {
            name: name.to_string(),
        })?;

        match id {
            ParamId::Ratio(band) => {
                let ratio = match value {
                    Value::Number(n) => n
                        .as_f64()
                        .and_then(|v| Ratio::from_value(v as f32))
                        .ok_or_else(|| TribandError::InvalidRatio {
                            value: n.to_string(),
                        })?,
                    Value::String(s) => s.parse::<Ratio>()?,
                    other => {
                        return Err(TribandError::InvalidRatio {
                            value: other.to_string(),
                        })
                    }
                };
                self.band_mut(band).ratio = ratio;
            }
            ParamId::Bypassed(band) | ParamId::Mute(band) | ParamId::Solo(band) => {
                let on = value
                    .as_bool()
                    .ok_or_else(|| invalid(&id, value, "true or false"))?;
                let state = self.band_mut(band);
                match id {
                    ParamId::Bypassed(_) => state.bypassed = on,
                    ParamId::Mute(_) => state.muted = on,
                    _ => state.soloed = on,
                }
            }
            _ => {
                let v = value
                    .as_f64()
                    .map(|v| v as f32)
                    .ok_or_else(|| invalid(&id, value, "a number"))?;
                if let ParamKind::Float(range, unit) = id.kind() {
                    if !range.contains(v) {
                        return Err(invalid(&id, value, &range.describe(unit)));
                    }
                }
                if let Some(slot) = self.float_slot(id) {
                    *slot = v;
                }
            }
        }

        debug!("{} = {}", id, value);
        Ok(())
    }

    /// Current value of one host parameter
    pub fn get_param(&self, name: &str) -> Result<Value> {
        let id = ParamId::from_name(name).ok_or_else(|| TribandError::UnknownParameter {
            name: name.to_string(),
        })?;
        let value = match id {
            ParamId::Ratio(b) => json!(self.band(b).ratio.value()),
            ParamId::Bypassed(b) => json!(self.band(b).bypassed),
            ParamId::Mute(b) => json!(self.band(b).muted),
            ParamId::Solo(b) => json!(self.band(b).soloed),
            _ => json!(self.float_value(id).unwrap_or_default()),
        };
        Ok(value)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Deserialize from JSON; missing fields take their defaults
    pub fn from_json(json: &Value) -> Result<Self> {
        Ok(serde_json::from_value(json.clone())?)
    }

    /// Load a settings file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let snapshot: ControlSnapshot = serde_json::from_str(&text)?;
        snapshot.validate()?;
        info!("Loaded settings from {}", path.display());
        Ok(snapshot)
    }

    /// Write a settings file as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("Saved settings to {}", path.display());
        Ok(())
    }

    fn float_value(&self, id: ParamId) -> Option<f32> {
        match id {
            ParamId::LowMidCrossoverFreq => Some(self.low_mid_crossover_hz),
            ParamId::MidHighCrossoverFreq => Some(self.mid_high_crossover_hz),
            ParamId::Threshold(b) => Some(self.band(b).threshold_db),
            ParamId::Attack(b) => Some(self.band(b).attack_ms),
            ParamId::Release(b) => Some(self.band(b).release_ms),
            ParamId::InputGain => Some(self.input_gain_db),
            ParamId::OutputGain => Some(self.output_gain_db),
            _ => None,
        }
    }

    fn float_slot(&mut self, id: ParamId) -> Option<&mut f32> {
        match id {
            ParamId::LowMidCrossoverFreq => Some(&mut self.low_mid_crossover_hz),
            ParamId::MidHighCrossoverFreq => Some(&mut self.mid_high_crossover_hz),
            ParamId::Threshold(b) => Some(&mut self.band_mut(b).threshold_db),
            ParamId::Attack(b) => Some(&mut self.band_mut(b).attack_ms),
            ParamId::Release(b) => Some(&mut self.band_mut(b).release_ms),
            ParamId::InputGain => Some(&mut self.input_gain_db),
            ParamId::OutputGain => Some(&mut self.output_gain_db),
            _ => None,
        }
    }
}

fn invalid(id: &ParamId, value: &Value, expected: &str) -> TribandError {
    TribandError::InvalidParameter {
        param: id.name(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}
