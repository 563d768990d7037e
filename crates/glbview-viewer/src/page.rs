//! Configuration from the hosting page
//!
//! Defaults are overridden first by an inline JSON block
//! (`<script type="application/json" id="viewer-config">`) and then by the
//! `?model=` URL query parameter.

use glbview_core::ViewerConfig;

const CONFIG_ELEMENT_ID: &str = "viewer-config";

/// Build the viewer configuration from the current page
pub fn load_config() -> ViewerConfig {
    let config = inline_config().unwrap_or_default();
    let config = apply_query_overrides(config, query_param("model"));
    tracing::info!("Viewer model: {}", config.model_url);
    config
}

/// Apply URL query overrides; blank values are ignored
fn apply_query_overrides(config: ViewerConfig, model: Option<String>) -> ViewerConfig {
    match model {
        Some(url) if !url.trim().is_empty() => config.with_model_url(url.trim()),
        _ => config,
    }
}

fn inline_config() -> Option<ViewerConfig> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
    let content = element.text_content()?;

    match ViewerConfig::from_json(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Ignoring #{} block: {}", CONFIG_ELEMENT_ID, e);
            None
        }
    }
}

fn query_param(name: &str) -> Option<String> {
    let href = web_sys::window()?.location().href().ok()?;
    let url = web_sys::Url::new(&href).ok()?;
    url.search_params().get(name)
}
