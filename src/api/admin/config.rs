//! Stored settings endpoints

use axum::extract::State;
use tracing::error;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::settings::{ServerSettings, SettingsUpdate};

/// Current `{serverConfig, appConfig}`
pub async fn get_config(State(state): State<AppState>) -> Result<Json<ServerSettings>, ApiError> {
    let settings = state.config_store.load().await.map_err(|e| {
        error!(error = %e, "Failed to load settings");
        ApiError::internal("Failed to get config")
    })?;

    Ok(Json(settings))
}

/// Replace the halves present in the body and return the stored result
pub async fn save_config(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<ServerSettings>, ApiError> {
    if let Some(server_config) = &update.server_config {
        let unknown: Vec<_> = server_config
            .keys()
            .filter(|id| !state.registry.contains(id))
            .collect();

        if !unknown.is_empty() {
            tracing::warn!(?unknown, "Saving server config with unregistered parameters");
        }
    }

    let settings = state.config_store.save(update).await.map_err(|e| {
        error!(error = %e, "Failed to save settings");
        ApiError::internal("Failed to save config")
    })?;

    Ok(Json(settings))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::admin::test_support::{router, send, state};
    use crate::api::state::AppState;
    use crate::domain::settings::MockConfigStore;
    use crate::domain::DomainError;
    use crate::domain::parameter::ParameterRegistry;

    #[tokio::test]
    async fn test_get_config_starts_empty() {
        let (status, body) = send(router(state()), "GET", "/api/config", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"serverConfig": {}, "appConfig": {}}));
    }

    #[tokio::test]
    async fn test_save_then_get() {
        let state = state();

        let (status, body) = send(
            router(state.clone()),
            "POST",
            "/api/config",
            Some(json!({"serverConfig": {"ctx-size": 4096}, "appConfig": {"theme": "dark"}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["serverConfig"]["ctx-size"], 4096);

        let (_, body) = send(
            router(state.clone()),
            "POST",
            "/api/config",
            Some(json!({"appConfig": {"theme": "light"}})),
        )
        .await;
        assert_eq!(body["serverConfig"]["ctx-size"], 4096);
        assert_eq!(body["appConfig"]["theme"], "light");

        let (_, body) = send(router(state), "GET", "/api/config", None).await;
        assert_eq!(body["appConfig"]["theme"], "light");
    }

    #[tokio::test]
    async fn test_save_rejects_bad_body() {
        let (status, body) = send(
            router(state()),
            "POST",
            "/api/config",
            Some(json!({"serverConfig": "not an object"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request body");
        assert!(body["details"].is_array());
    }

    #[tokio::test]
    async fn test_store_failures_map_to_500() {
        let mut store = MockConfigStore::new();
        store
            .expect_load()
            .returning(|| Err(DomainError::storage("unreadable")));
        store
            .expect_save()
            .returning(|_| Err(DomainError::storage("read-only")));

        let state = AppState::new(
            Arc::new(ParameterRegistry::llama_cpp().unwrap()),
            Arc::new(store),
        );

        let (status, body) = send(router(state.clone()), "GET", "/api/config", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to get config"}));

        let (status, body) = send(
            router(state),
            "POST",
            "/api/config",
            Some(json!({"appConfig": {}})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to save config"}));
    }
}
