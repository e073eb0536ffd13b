//! Configuration persistence for VIZOR
//!
//! A versioned, key-ordered flat record. The version tag leads the file;
//! any mismatch abandons the entire load and keeps defaults - settings are
//! never applied partially.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use vizor_analysis::SmoothingMode;
use vizor_audio::SpectrumParams;

const CONFIG_VERSION: u32 = 1;

/// Application configuration
#[derive(Debug, Default)]
pub struct Config {
    pub params: SpectrumParams,
}

impl Config {
    /// Load config from the default location.
    ///
    /// Returns default config if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        let path = Self::config_path();
        Self::load_from(&path).unwrap_or_default()
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Save config to the default location
    pub fn save(&self) -> io::Result<()> {
        let path = Self::config_path();
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = self.serialize();
        fs::write(path, content)
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vizor")
            .join("config.txt")
    }

    /// Parse config from the versioned key=value format
    fn parse(content: &str) -> Self {
        let mut config = Self::default();
        let mut lines = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));

        // The version tag must lead the record.
        let version = lines
            .next()
            .and_then(|line| line.strip_prefix("version="))
            .and_then(|value| value.trim().parse::<u32>().ok());
        if version != Some(CONFIG_VERSION) {
            return config;
        }

        for line in lines {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            let params = &mut config.params;

            match key {
                "bars" => {
                    if let Ok(v) = value.parse() {
                        params.set_bars(v);
                    }
                }
                "freq_ceiling" => {
                    if let Ok(v) = value.parse() {
                        params.set_freq_ceiling(v);
                    }
                }
                "smoothing" => {
                    if let Ok(v) = value.parse() {
                        params.set_smoothing(v);
                    }
                }
                "smoothing_mode" => {
                    params.mode = if value.eq_ignore_ascii_case("decay") {
                        SmoothingMode::DecayOnly
                    } else {
                        SmoothingMode::Normal
                    };
                }
                "peak_decay" => {
                    if let Ok(v) = value.parse() {
                        params.set_peak_decay(v);
                    }
                }
                "peaks" => {
                    if let Some(v) = parse_flag(value) {
                        params.peaks = v;
                    }
                }
                "auto_gain" => {
                    if let Some(v) = parse_flag(value) {
                        params.auto_gain = v;
                    }
                }
                "curve" => {
                    if let Some(v) = parse_flag(value) {
                        params.curve = v;
                    }
                }
                "linear_scale" => {
                    if let Ok(v) = value.parse() {
                        params.set_linear_scale(v);
                    }
                }
                "log_scale" => {
                    if let Ok(v) = value.parse() {
                        params.set_log_scale(v);
                    }
                }
                "color_rate" => {
                    if let Ok(v) = value.parse() {
                        params.set_color_rate(v);
                    }
                }
                "color_offset" => {
                    if let Ok(v) = value.parse() {
                        params.set_color_offset(v);
                    }
                }
                "color_shading" => {
                    if let Ok(v) = value.parse() {
                        params.set_color_shading(v);
                    }
                }
                _ => {} // Ignore unknown keys
            }
        }

        config
    }

    /// Serialize config in fixed key order, version tag first
    fn serialize(&self) -> String {
        let p = &self.params;
        let mode = match p.mode {
            SmoothingMode::Normal => "normal",
            SmoothingMode::DecayOnly => "decay",
        };

        let mut lines = Vec::new();
        lines.push("# VIZOR Configuration".to_string());
        lines.push(format!("version={CONFIG_VERSION}"));
        lines.push(format!("bars={}", p.bars));
        lines.push(format!("freq_ceiling={}", p.freq_ceiling));
        lines.push(format!("smoothing={}", p.smoothing));
        lines.push(format!("smoothing_mode={mode}"));
        lines.push(format!("peak_decay={}", p.peak_decay));
        lines.push(format!("peaks={}", p.peaks));
        lines.push(format!("auto_gain={}", p.auto_gain));
        lines.push(format!("curve={}", p.curve));
        lines.push(format!("linear_scale={}", p.calibration.linear));
        lines.push(format!("log_scale={:e}", p.calibration.logarithmic));
        lines.push(format!("color_rate={}", p.color_rate));
        lines.push(format!("color_offset={}", p.color_offset));
        lines.push(format!("color_shading={}", p.color_shading));
        lines.join("\n")
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "true" | "on" | "1" => Some(true),
        "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_keeps_defaults() {
        let config = Config::parse("");
        assert_eq!(config.params, SpectrumParams::default());
    }

    #[test]
    fn test_version_mismatch_abandons_whole_load() {
        let content = "version=2\nbars=64\nsmoothing=0.9";
        let config = Config::parse(content);
        assert_eq!(config.params, SpectrumParams::default());
    }

    #[test]
    fn test_missing_version_abandons_whole_load() {
        let config = Config::parse("bars=64");
        assert_eq!(config.params, SpectrumParams::default());
    }

    #[test]
    fn test_parse_with_comments() {
        let content = "# Comment\nversion=1\n# Another\nbars=64";
        let config = Config::parse(content);
        assert_eq!(config.params.bars, 64);
    }

    #[test]
    fn test_values_pass_through_the_clamping_setters() {
        let content = "version=1\nbars=100000\nsmoothing=5.0";
        let config = Config::parse(content);
        assert_eq!(config.params.bars, 2048);
        assert_eq!(config.params.smoothing, 0.95);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let content = "version=1\nbars=16\nmystery=42";
        let config = Config::parse(content);
        assert_eq!(config.params.bars, 16);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let mut config = Config::default();
        config.params.set_bars(48);
        config.params.set_smoothing(0.5);
        config.params.mode = SmoothingMode::DecayOnly;
        config.params.curve = true;
        config.params.set_log_scale(2.2e-8);

        let parsed = Config::parse(&config.serialize());
        assert_eq!(parsed.params, config.params);
    }
}
