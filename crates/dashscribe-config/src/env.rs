use secrecy::SecretString;

use crate::Config;

/// Environment binding for the `DashScope` API key
pub const API_KEY_VAR: &str = "DASHSCOPE_API_KEY";
/// Environment binding for the default model name
pub const DEFAULT_MODEL_VAR: &str = "DEFAULT_MODEL_NAME";
/// Environment binding for the region selector
pub const REGION_VAR: &str = "API_REGION";

/// Overlay deployment environment bindings onto a loaded configuration
///
/// A variable only takes effect when it is set. Empty values are kept as-is
/// so that an empty key still reads as "not configured" at request time.
pub fn apply_overrides(config: &mut Config) {
    apply_overrides_from(config, |name| std::env::var(name).ok());
}

fn apply_overrides_from(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    let dashscope = &mut config.dashscope;

    if let Some(key) = lookup(API_KEY_VAR) {
        tracing::debug!("using DashScope API key from {API_KEY_VAR}");
        dashscope.api_key = Some(SecretString::from(key));
    }

    if let Some(model) = lookup(DEFAULT_MODEL_VAR) {
        dashscope.default_model = Some(model);
    }

    if let Some(region) = lookup(REGION_VAR) {
        dashscope.region = Some(region);
    }
}
