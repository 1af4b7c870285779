//! Migration of legacy provider settings into the current `APPS` layout.
//!
//! Older deployments configured OpenID Connect identity servers as a
//! `SERVERS` list with an `APP` block per server. Consumers now expect a flat
//! `APPS` list where each app carries its `provider_id`, `name` and a nested
//! `settings` object. The transform is pure: it never touches its input.

use serde_json::{Map, Value};

use crate::defaults::OPENID_CONNECT;
use crate::error::{ConfigError, ConfigResult};

const SERVERS: &str = "SERVERS";
const APPS: &str = "APPS";

/// Whether `entry` still uses the legacy `SERVERS` layout.
#[must_use]
pub fn is_legacy_shape(entry: &Value) -> bool {
    entry.get(SERVERS).is_some_and(|servers| !servers.is_null())
}

/// Rewrite a legacy `openid_connect` provider entry into the `APPS` layout.
///
/// Entries without `SERVERS` are returned unchanged. Otherwise the result
/// holds only `APPS`, one app per server in the original order.
///
/// # Errors
///
/// Returns [`ConfigError::MissingField`] when a server lacks `APP`,
/// `server_url` or `id`, [`ConfigError::EmptyProviderId`] when `id` is empty,
/// and [`ConfigError::InvalidField`] when `SERVERS`, one of its entries or an
/// `id` has the wrong shape.
pub fn migrate_openid_connect(entry: &Value) -> ConfigResult<Value> {
    let servers = match entry.get(SERVERS) {
        None | Some(Value::Null) => return Ok(entry.clone()),
        Some(Value::Array(servers)) => servers,
        Some(other) => {
            return Err(ConfigError::InvalidField {
                section: OPENID_CONNECT.to_string(),
                field: SERVERS.to_string(),
                value: Some(other.to_string()),
                reason: "must be a list",
            });
        }
    };

    let apps = servers
        .iter()
        .enumerate()
        .map(|(index, server)| migrate_server(index, server))
        .collect::<ConfigResult<Vec<_>>>()?;

    let mut migrated = Map::new();
    migrated.insert(APPS.to_string(), Value::Array(apps));
    Ok(Value::Object(migrated))
}

fn migrate_server(index: usize, server: &Value) -> ConfigResult<Value> {
    let Some(server) = server.as_object() else {
        return Err(invalid_server(index, SERVERS, server, "server entry must be an object"));
    };

    let mut app = match server.get("APP") {
        Some(Value::Object(app)) => app.clone(),
        Some(other) => return Err(invalid_server(index, "APP", other, "must be an object")),
        None => return Err(missing(index, "APP")),
    };

    let mut settings = Map::new();
    if let Some(method) = server.get("token_auth_method") {
        settings.insert("token_auth_method".to_string(), method.clone());
    }
    let server_url = server
        .get("server_url")
        .ok_or_else(|| missing(index, "server_url"))?;
    settings.insert("server_url".to_string(), server_url.clone());

    let provider_id = server.get("id").ok_or_else(|| missing(index, "id"))?;
    match provider_id.as_str() {
        Some("") => return Err(ConfigError::EmptyProviderId { index }),
        Some(_) => {}
        None => return Err(invalid_server(index, "id", provider_id, "must be a string")),
    }

    app.insert(
        "name".to_string(),
        server
            .get("name")
            .cloned()
            .unwrap_or_else(|| Value::String(String::new())),
    );
    app.insert("provider_id".to_string(), provider_id.clone());
    app.insert("settings".to_string(), Value::Object(settings));
    Ok(Value::Object(app))
}

fn missing(index: usize, field: &str) -> ConfigError {
    ConfigError::MissingField {
        section: format!("{OPENID_CONNECT}.{SERVERS}"),
        field: field.to_string(),
        index,
    }
}

fn invalid_server(index: usize, field: &str, value: &Value, reason: &'static str) -> ConfigError {
    ConfigError::InvalidField {
        section: format!("{OPENID_CONNECT}.{SERVERS}[{index}]"),
        field: field.to_string(),
        value: Some(value.to_string()),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn migrates_single_server() {
        let legacy = json!({
            "SERVERS": [{
                "id": "p1",
                "server_url": "https://idp.example/",
                "APP": {"client_id": "x"}
            }]
        });

        let migrated = migrate_openid_connect(&legacy).expect("legacy entry should migrate");
        assert_eq!(
            migrated,
            json!({
                "APPS": [{
                    "client_id": "x",
                    "name": "",
                    "provider_id": "p1",
                    "settings": {"server_url": "https://idp.example/"}
                }]
            })
        );
    }

    #[test]
    fn current_shape_passes_through() {
        let current = json!({
            "APPS": [{
                "provider_id": "p1",
                "client_id": "x",
                "settings": {"server_url": "https://idp.example/"}
            }]
        });
        assert!(!is_legacy_shape(&current));
        assert_eq!(migrate_openid_connect(&current).unwrap(), current);

        let null_servers = json!({"SERVERS": null, "APPS": []});
        assert!(!is_legacy_shape(&null_servers));
        assert_eq!(migrate_openid_connect(&null_servers).unwrap(), null_servers);
    }

    #[test]
    fn preserves_server_order() {
        let legacy = json!({
            "SERVERS": [
                {"id": "a", "server_url": "https://a.example", "APP": {}},
                {"id": "b", "server_url": "https://b.example", "APP": {}},
                {"id": "c", "server_url": "https://c.example", "APP": {}}
            ]
        });

        let migrated = migrate_openid_connect(&legacy).unwrap();
        let ids: Vec<_> = migrated["APPS"]
            .as_array()
            .unwrap()
            .iter()
            .map(|app| app["provider_id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn token_auth_method_only_when_present() {
        let legacy = json!({
            "SERVERS": [
                {
                    "id": "with",
                    "name": "With Method",
                    "server_url": "https://a.example",
                    "token_auth_method": "client_secret_post",
                    "APP": {"client_id": "a"}
                },
                {"id": "without", "server_url": "https://b.example", "APP": {"client_id": "b"}}
            ]
        });

        let migrated = migrate_openid_connect(&legacy).unwrap();
        let apps = migrated["APPS"].as_array().unwrap();
        assert_eq!(
            apps[0]["settings"],
            json!({
                "server_url": "https://a.example",
                "token_auth_method": "client_secret_post"
            })
        );
        assert_eq!(apps[0]["name"], json!("With Method"));
        assert!(apps[1]["settings"].get("token_auth_method").is_none());
    }

    #[test]
    fn drops_sibling_keys_and_leaves_input_untouched() {
        let legacy = json!({
            "SERVERS": [{"id": "p1", "server_url": "https://idp.example/", "APP": {}}],
            "VERIFIED_EMAIL": true
        });
        let before = legacy.clone();

        let migrated = migrate_openid_connect(&legacy).unwrap();
        assert!(migrated.get("SERVERS").is_none());
        assert!(migrated.get("VERIFIED_EMAIL").is_none());
        assert_eq!(legacy, before);
    }

    #[test]
    fn rejects_missing_or_empty_id() {
        let missing_id = json!({
            "SERVERS": [{"server_url": "https://idp.example/", "APP": {}}]
        });
        let err = migrate_openid_connect(&missing_id).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { ref field, index: 0, .. } if field == "id"));

        let empty_id = json!({
            "SERVERS": [
                {"id": "ok", "server_url": "https://a.example", "APP": {}},
                {"id": "", "server_url": "https://b.example", "APP": {}}
            ]
        });
        let err = migrate_openid_connect(&empty_id).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyProviderId { index: 1 }));
    }

    #[test]
    fn rejects_non_string_id_as_invalid() {
        let numeric_id = json!({
            "SERVERS": [{"id": 7, "server_url": "https://a.example", "APP": {}}]
        });
        let err = migrate_openid_connect(&numeric_id).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidField { ref field, reason: "must be a string", .. } if field == "id"
        ));
    }

    #[test]
    fn rejects_missing_server_url_and_app() {
        let no_url = json!({"SERVERS": [{"id": "p1", "APP": {}}]});
        let err = migrate_openid_connect(&no_url).unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingField { ref field, .. } if field == "server_url")
        );

        let no_app = json!({"SERVERS": [{"id": "p1", "server_url": "https://a.example"}]});
        let err = migrate_openid_connect(&no_app).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { ref field, .. } if field == "APP"));
    }

    #[test]
    fn rejects_malformed_servers() {
        let not_list = json!({"SERVERS": {"id": "p1"}});
        assert!(matches!(
            migrate_openid_connect(&not_list).unwrap_err(),
            ConfigError::InvalidField { .. }
        ));

        let not_object = json!({"SERVERS": ["p1"]});
        assert!(matches!(
            migrate_openid_connect(&not_object).unwrap_err(),
            ConfigError::InvalidField { .. }
        ));
    }
}
