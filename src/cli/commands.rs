//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use log::{debug, info};
use serde_json::Value;

use crate::dsp::MultibandProcessor;
use crate::engine::{read_wav, validate_layout, write_wav, AudioBlock};
use crate::error::{Result, TribandError};
use crate::params::{Band, ControlSnapshot, ParamId, ParamKind, Ratio};

/// Summary of a finished render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub num_channels: usize,
    pub num_samples: usize,
    pub sample_rate: u32,
    pub blocks: usize,
    /// Deepest gain reduction seen at any block boundary, per band
    pub max_gain_reduction_db: [f32; 3],
}

/// Split a `NAME=VALUE` override into a parameter name and JSON value
///
/// The value is parsed as JSON when possible (`-20`, `true`) and kept as a
/// string otherwise (`4:1`).
pub fn parse_override(arg: &str) -> Result<(String, Value)> {
    let (name, raw) = arg
        .split_once('=')
        .ok_or_else(|| TribandError::InvalidParameter {
            param: arg.to_string(),
            value: String::new(),
            expected: "NAME=VALUE".to_string(),
        })?;
    let raw = raw.trim();
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((name.trim().to_string(), value))
}

/// Load settings (or defaults), apply overrides and validate the result
pub fn load_settings(settings: Option<&Path>, overrides: &[String]) -> Result<ControlSnapshot> {
    let mut controls = match settings {
        Some(path) => ControlSnapshot::load(path)?,
        None => ControlSnapshot::default(),
    };
    for arg in overrides {
        let (name, value) = parse_override(arg)?;
        debug!("Override {} = {}", name, value);
        controls.set_param(&name, &value)?;
    }
    controls.validate()?;
    Ok(controls)
}

/// Stream a WAV file through the processor in host-sized blocks
pub fn render(
    input: &Path,
    output: &Path,
    controls: &ControlSnapshot,
    block_size: usize,
) -> Result<RenderReport> {
    info!("Rendering {} -> {}", input.display(), output.display());

    let audio = read_wav(input)?;
    let layout = validate_layout(audio.block.num_channels())?;
    debug!("Input layout: {:?}", layout);

    let num_channels = audio.block.num_channels();
    let num_samples = audio.block.num_samples();

    let mut processor = MultibandProcessor::new();
    processor.prepare(audio.sample_rate as f64, block_size, num_channels)?;
    processor.ensure_prepared()?;

    let mut rendered = audio.block.clone();
    let mut block = AudioBlock::new(num_channels, block_size);
    let mut max_gain_reduction_db = [0.0_f32; 3];
    let mut blocks = 0;

    let mut start = 0;
    while start < num_samples {
        let len = (num_samples - start).min(block_size);
        block.copy_from_range(&audio.block, start, len);
        processor.process(&mut block, controls);
        block.write_to_range(&mut rendered, start);

        for band in Band::ALL {
            let reduction = processor.gain_reduction_db(band);
            let slot = &mut max_gain_reduction_db[band.index()];
            *slot = slot.min(reduction);
        }
        blocks += 1;
        start += len;
    }

    if !rendered.is_valid() {
        return Err(TribandError::InvalidAudio {
            reason: "render produced non-finite samples".to_string(),
        });
    }

    write_wav(output, &rendered, audio.sample_rate)?;
    info!("Rendered {} blocks ({:.2}s)", blocks, audio.duration_secs());

    Ok(RenderReport {
        num_channels,
        num_samples,
        sample_rate: audio.sample_rate,
        blocks,
        max_gain_reduction_db,
    })
}

/// Print a render summary
pub fn print_render_report(report: &RenderReport) {
    println!(
        "Rendered {} samples x {} ch at {} Hz in {} blocks",
        report.num_samples, report.num_channels, report.sample_rate, report.blocks
    );
    for band in Band::ALL {
        println!(
            "  {:<5} max gain reduction: {:>7.2} dB",
            band.name(),
            report.max_gain_reduction_db[band.index()]
        );
    }
}

/// Print the default settings as JSON, or write them to a file
pub fn defaults(output: Option<&Path>) -> Result<()> {
    let controls = ControlSnapshot::default();
    match output {
        Some(path) => {
            controls.save(path)?;
            println!("Default settings written: {}", path.display());
        }
        None => {
            let json = serde_json::to_string_pretty(&controls)?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// One line of the parameter table
pub fn describe_param(id: ParamId) -> String {
    let range = match id.kind() {
        ParamKind::Float(range, unit) => {
            format!("{} .. {} {} (step {})", range.min, range.max, unit, range.step)
        }
        ParamKind::Choice => Ratio::ALL
            .iter()
            .map(|r| r.choice_name())
            .collect::<Vec<_>>()
            .join(", "),
        ParamKind::Bool => "on / off".to_string(),
    };
    format!("{:<26} {:<12} {}", id.name(), id.default_display(), range)
}

/// List every host parameter
pub fn list_params() -> Result<()> {
    println!("{:<26} {:<12} {}", "Parameter", "Default", "Range");
    println!("{:-<80}", "");
    for id in ParamId::all() {
        println!("{}", describe_param(id));
    }
    Ok(())
}

/// Check a settings file without rendering anything
pub fn validate_settings(path: &Path) -> Result<()> {
    info!("Validating settings: {}", path.display());
    ControlSnapshot::load(path)?;
    println!("Settings OK: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_override_number() {
        let (name, value) = parse_override("Threshold Low Band=-20").unwrap();
        assert_eq!(name, "Threshold Low Band");
        assert_eq!(value, json!(-20));
    }

    #[test]
    fn test_parse_override_bool_and_string() {
        assert_eq!(parse_override("Solo Mid Band=true").unwrap().1, json!(true));
        assert_eq!(parse_override("Ratio High Band=4:1").unwrap().1, json!("4:1"));
    }

    #[test]
    fn test_parse_override_requires_equals() {
        let err = parse_override("Input Gain").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
    }

    #[test]
    fn test_load_settings_applies_overrides() {
        let overrides = vec![
            "Threshold Low Band=-20".to_string(),
            "Ratio Low Band=8:1".to_string(),
            "Mute High Band=true".to_string(),
        ];
        let controls = load_settings(None, &overrides).unwrap();
        assert_eq!(controls.band(Band::Low).threshold_db, -20.0);
        assert_eq!(controls.band(Band::Low).ratio, Ratio::Eight);
        assert!(controls.band(Band::High).muted);
    }

    #[test]
    fn test_load_settings_rejects_unknown_name() {
        let err = load_settings(None, &["Wet Mix=0.5".to_string()]).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_PARAMETER");
    }

    #[test]
    fn test_describe_param_lists_ratio_choices() {
        let line = describe_param(ParamId::Ratio(Band::Mid));
        assert!(line.starts_with("Ratio Mid Band"));
        assert!(line.contains("100.0"));
    }
}
