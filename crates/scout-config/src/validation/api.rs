use crate::schema::ScoutConfig;

use super::helpers::validate_range;

/// Validate the `[api]` section.
pub(crate) fn validate_api(errors: &mut Vec<String>, config: &ScoutConfig) {
    let api = &config.api;

    if !(api.base_url.starts_with("https://") || api.base_url.starts_with("http://")) {
        errors.push(format!(
            "api.base_url '{}' must start with http:// or https://",
            api.base_url
        ));
    }
    validate_range(
        errors,
        "api.connect_timeout_secs",
        api.connect_timeout_secs.into(),
        1,
        60,
    );
    validate_range(
        errors,
        "api.request_timeout_secs",
        api.request_timeout_secs.into(),
        5,
        600,
    );
}
