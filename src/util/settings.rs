// Copyright (c) 2024 Mike Tsao

//! Structs that hold configuration information about a controller and its
//! rules. Intended to be serialized.

use crate::{detection::ProximityRule, types::Seconds};
use anyhow::{anyhow, Context, Result};
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Controller-wide settings.
#[derive(Clone, Debug, Derivative, Serialize, Deserialize, PartialEq)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct ControllerSettings {
    /// How often the proximity scan runs.
    #[derivative(Default(value = "Seconds(0.1)"))]
    pub check_interval: Seconds,

    /// Directory that static row sources are relative to.
    #[derivative(Default(value = "PathBuf::from(\"assets\")"))]
    pub assets_root: PathBuf,

    /// Subdirectory of [ControllerSettings::assets_root] that curve sources
    /// are relative to.
    #[derivative(Default(value = "\"Audio\".to_string()"))]
    pub curve_subdir: String,

    /// How many [DetectionEvent](crate::detection::DetectionEvent)s the
    /// history keeps before evicting the oldest.
    #[derivative(Default(value = "256"))]
    pub history_capacity: usize,

    /// Emits per-line and per-sample traces while loading and playing curves.
    pub enable_debug_logs: bool,

    /// Logs every detection, exit, and stay notification.
    pub debug_collisions: bool,
}
impl ControllerSettings {
    /// The directory that curve source names are resolved against.
    pub fn curve_root(&self) -> PathBuf {
        self.assets_root.join(&self.curve_subdir)
    }

    fn validate(&self) -> Result<()> {
        if !(self.check_interval.0 >= 0.0) {
            return Err(anyhow!(
                "check-interval must be non-negative, but was {}",
                self.check_interval.0
            ));
        }
        if self.history_capacity == 0 {
            return Err(anyhow!("history-capacity must be at least 1"));
        }
        Ok(())
    }
}

/// Everything a [ProximityController](crate::ProximityController) needs:
/// settings plus the rules it evaluates.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ControllerConfig {
    #[allow(missing_docs)]
    #[serde(default)]
    pub settings: ControllerSettings,
    #[allow(missing_docs)]
    #[serde(default)]
    pub rules: Vec<ProximityRule>,
}
impl ControllerConfig {
    /// Parses a JSON configuration and validates it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("couldn't read config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in config {}", path.display()))
    }

    /// Writes this configuration as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("couldn't write config {}", path.display()))?;
        Ok(())
    }

    /// Checks the settings and every rule.
    pub fn validate(&self) -> Result<()> {
        self.settings.validate()?;
        for (i, rule) in self.rules.iter().enumerate() {
            rule.validate()
                .map_err(|e| anyhow!("rule #{i} ({}): {e}", rule.primary_event))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AudioEventName, EntityUid};

    #[test]
    fn defaults_match_documented_values() {
        let s = ControllerSettings::default();
        assert_eq!(s.check_interval, Seconds(0.1));
        assert_eq!(s.curve_root(), PathBuf::from("assets").join("Audio"));
        assert_eq!(s.history_capacity, 256);
        assert!(!s.enable_debug_logs);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config = ControllerConfig::from_json(
            r#"{
                "settings": { "assets-root": "/game/StreamingAssets" },
                "rules": [ { "primary-event": "Play_Hit", "tracked": [7] } ]
            }"#,
        )
        .unwrap();
        assert_eq!(
            config.settings.assets_root,
            PathBuf::from("/game/StreamingAssets")
        );
        assert_eq!(config.settings.check_interval, Seconds(0.1));
        assert_eq!(config.rules.len(), 1);
        assert_eq!(
            config.rules[0].primary_event,
            AudioEventName::from("Play_Hit")
        );
        assert_eq!(config.rules[0].tracked, vec![EntityUid(7)]);
    }

    #[test]
    fn invalid_rules_are_rejected() {
        let result = ControllerConfig::from_json(
            r#"{ "rules": [ { "primary-event": "Play_Hit",
                "distance-gate": { "start": 5.0, "end": 1.0 } } ] }"#,
        );
        assert!(result.is_err());

        let result = ControllerConfig::from_json(r#"{ "settings": { "history-capacity": 0 } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("controller.json");
        let mut config = ControllerConfig::default();
        config.settings.enable_debug_logs = true;
        config.save(&path).unwrap();
        assert_eq!(ControllerConfig::load(&path).unwrap(), config);

        assert!(ControllerConfig::load(&dir.path().join("missing.json")).is_err());
    }
}
