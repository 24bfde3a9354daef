use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use breathe_hdl::breathe::PowerUp;
use serde::Deserialize;

pub const DEFAULT_TICKS: u64 = 64;

/// Simulation settings read from a JSON file. Command line flags take
/// precedence over every field.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub ticks: Option<u64>,
    pub skip: Option<u64>,
    pub vcd: Option<PathBuf>,
    pub power_up: PowerUp,
}

impl SimConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config = fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;

        Self::parse(&config).with_context(|| format!("invalid config '{}'", path.display()))
    }

    pub fn parse(config: &str) -> anyhow::Result<Self> {
        serde_json::from_str(config).context("failed to parse config")
    }
}

#[cfg(test)]
mod tests {
    use breathe_hdl::breathe::Step;

    use super::*;

    #[test]
    fn empty_config() {
        let config = SimConfig::parse("{}").unwrap();

        assert_eq!(config.ticks, None);
        assert_eq!(config.power_up, PowerUp::default());
    }

    #[test]
    fn full_config() {
        let config = SimConfig::parse(
            r#"{
                "ticks": 32,
                "skip": 4194304,
                "vcd": "out.vcd",
                "power_up": { "ramp": 1, "delta": 1, "subcount": 15 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.ticks, Some(32));
        assert_eq!(config.skip, Some(4194304));
        assert_eq!(config.vcd, Some(PathBuf::from("out.vcd")));
        assert_eq!(config.power_up.ramp, 1);
        assert_eq!(config.power_up.delta, Step::Up);
        assert_eq!(config.power_up.subcount, 15);
    }

    #[test]
    fn rejects_out_of_range_registers() {
        assert!(SimConfig::parse(r#"{ "power_up": { "ramp": 8388608 } }"#).is_err());
        assert!(SimConfig::parse(r#"{ "power_up": { "delta": -2 } }"#).is_err());
        assert!(SimConfig::parse(r#"{ "cycles": 10 }"#).is_err());
    }
}
