//! Persisted admin settings

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::parameter::Configuration;

/// The two halves of the stored admin configuration
///
/// `server_config` holds llama-server parameters keyed by parameter id;
/// `app_config` holds free-form application preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSettings {
    #[serde(default)]
    pub server_config: Map<String, Value>,
    #[serde(default)]
    pub app_config: Map<String, Value>,
}

impl ServerSettings {
    /// Overwrite each half the update provides
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(server_config) = update.server_config {
            self.server_config = server_config;
        }
        if let Some(app_config) = update.app_config {
            self.app_config = app_config;
        }
    }

    /// Server half as a parameter configuration
    pub fn parameters(&self) -> Result<Configuration, serde_json::Error> {
        serde_json::from_value(Value::Object(self.server_config.clone()))
    }
}

/// Partial update; absent halves are left untouched
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsUpdate {
    pub server_config: Option<Map<String, Value>>,
    pub app_config: Option<Map<String, Value>>,
}

impl SettingsUpdate {
    /// Update replacing only the server half with `config`
    pub fn server(config: &Configuration) -> Result<Self, serde_json::Error> {
        let server_config = match serde_json::to_value(config)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Ok(Self {
            server_config: Some(server_config),
            app_config: None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.server_config.is_none() && self.app_config.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parameter::ParameterValue;
    use serde_json::json;

    #[test]
    fn test_apply_replaces_provided_halves() {
        let mut settings: ServerSettings = serde_json::from_value(json!({
            "serverConfig": {"ctx-size": 2048},
            "appConfig": {"theme": "dark"}
        }))
        .unwrap();

        let update: SettingsUpdate =
            serde_json::from_value(json!({"serverConfig": {"ctx-size": 4096}})).unwrap();
        settings.apply(update);

        assert_eq!(settings.server_config["ctx-size"], 4096);
        assert_eq!(settings.app_config["theme"], "dark");
    }

    #[test]
    fn test_update_rejects_non_objects_and_unknown_keys() {
        assert!(serde_json::from_value::<SettingsUpdate>(json!({"serverConfig": 5})).is_err());
        assert!(serde_json::from_value::<SettingsUpdate>(json!({"other": {}})).is_err());
    }

    #[test]
    fn test_parameters_round_trip() {
        let config = Configuration::new()
            .with("ctx-size", 4096)
            .with("samplers", vec!["topk"]);

        let mut settings = ServerSettings::default();
        settings.apply(SettingsUpdate::server(&config).unwrap());

        let parsed = settings.parameters().unwrap();
        assert_eq!(parsed.get("ctx-size"), Some(&ParameterValue::from(4096)));
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(ServerSettings::default()).unwrap();
        assert_eq!(json, json!({"serverConfig": {}, "appConfig": {}}));
    }
}
