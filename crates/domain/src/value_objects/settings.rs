//! Online service settings
//!
//! Settings are plain serde data so they can be loaded from a config file
//! or from the environment with the same defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::ids::SessionTag;

const DEFAULT_API_ADDRESS: &str = "http://127.0.0.1:36000/";

/// How the emulated console reaches other players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkMode {
    Offline,
    SystemLink,
    #[default]
    Online,
}

impl NetworkMode {
    /// Tag used for sessions created locally in this mode.
    ///
    /// Offline play still creates LAN-style sessions, so it shares the
    /// system link tag.
    pub fn session_tag(self) -> SessionTag {
        match self {
            NetworkMode::Offline | NetworkMode::SystemLink => SessionTag::SystemLink,
            NetworkMode::Online => SessionTag::Online,
        }
    }

    pub fn uses_backend(self) -> bool {
        matches!(self, NetworkMode::Online)
    }
}

impl fmt::Display for NetworkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkMode::Offline => write!(f, "offline"),
            NetworkMode::SystemLink => write!(f, "system_link"),
            NetworkMode::Online => write!(f, "online"),
        }
    }
}

impl FromStr for NetworkMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offline" | "0" => Ok(NetworkMode::Offline),
            "system_link" | "systemlink" | "lan" | "1" => Ok(NetworkMode::SystemLink),
            "online" | "xbox_live" | "2" => Ok(NetworkMode::Online),
            _ => Err(DomainError::parse(format!("Unknown network mode: {}", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineSettings {
    /// Base address of the backend service
    #[serde(default = "default_api_address")]
    pub api_address: String,

    #[serde(default)]
    pub network_mode: NetworkMode,
}

fn default_api_address() -> String {
    DEFAULT_API_ADDRESS.to_string()
}

impl Default for OnlineSettings {
    fn default() -> Self {
        Self {
            api_address: default_api_address(),
            network_mode: NetworkMode::default(),
        }
    }
}

impl OnlineSettings {
    /// Load settings from `XONLINE_API_ADDRESS` and `XONLINE_NETWORK_MODE`,
    /// falling back to defaults if not set.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Parse` if `XONLINE_NETWORK_MODE` is set to an
    /// unknown mode.
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`OnlineSettings::from_env`] with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DomainError> {
        let mut settings = Self::default();
        if let Some(address) = lookup("XONLINE_API_ADDRESS") {
            settings.api_address = address;
        }
        if let Some(mode) = lookup("XONLINE_NETWORK_MODE") {
            settings.network_mode = mode.parse()?;
        }
        settings.api_address = normalize_api_address(&settings.api_address);
        Ok(settings)
    }

    /// Join an endpoint path onto the API address.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_address, path.trim_start_matches('/'))
    }
}

fn normalize_api_address(address: &str) -> String {
    let trimmed = address.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let settings = OnlineSettings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, OnlineSettings::default());
        assert_eq!(settings.network_mode, NetworkMode::Online);
    }

    #[test]
    fn reads_overrides_and_normalizes_address() {
        let settings = OnlineSettings::from_lookup(lookup(&[
            ("XONLINE_API_ADDRESS", "http://10.0.0.5:36000"),
            ("XONLINE_NETWORK_MODE", "system_link"),
        ]))
        .unwrap();
        assert_eq!(settings.api_address, "http://10.0.0.5:36000/");
        assert_eq!(settings.network_mode, NetworkMode::SystemLink);
        assert_eq!(
            settings.endpoint("/players/find"),
            "http://10.0.0.5:36000/players/find"
        );
    }

    #[test]
    fn rejects_unknown_mode() {
        let result = OnlineSettings::from_lookup(lookup(&[("XONLINE_NETWORK_MODE", "carrier")]));
        assert!(matches!(result, Err(DomainError::Parse(_))));
    }

    #[test]
    fn serde_fills_missing_fields_with_defaults() {
        let settings: OnlineSettings = serde_json::from_str(r#"{"network_mode":"offline"}"#).unwrap();
        assert_eq!(settings.api_address, DEFAULT_API_ADDRESS);
        assert_eq!(settings.network_mode.session_tag(), SessionTag::SystemLink);
    }
}
