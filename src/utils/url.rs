//! Endpoint construction for the generative API.
//!
//! Base URLs come from user config and may carry trailing slashes; model names
//! may arrive either bare (`gemini-pro`) or as resource names (`models/gemini-pro`).

/// Strip trailing slashes from a base URL.
///
/// ```
/// use era::utils::url::normalize_base_url;
///
/// assert_eq!(
///     normalize_base_url("https://generativelanguage.googleapis.com/v1beta/"),
///     "https://generativelanguage.googleapis.com/v1beta"
/// );
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash.
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// URL for a model method such as `generateContent`.
///
/// ```
/// use era::utils::url::model_action_url;
///
/// assert_eq!(
///     model_action_url("https://example.test/v1beta", "gemini-pro", "generateContent"),
///     "https://example.test/v1beta/models/gemini-pro:generateContent"
/// );
/// ```
pub fn model_action_url(base_url: &str, model: &str, action: &str) -> String {
    let model = model.trim().trim_start_matches("models/");
    construct_api_url(base_url, &format!("models/{model}:{action}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_base_url_trims_every_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://example.test/v1beta"),
            "https://example.test/v1beta"
        );
        assert_eq!(
            normalize_base_url("https://example.test/v1beta///"),
            "https://example.test/v1beta"
        );
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn construct_api_url_avoids_double_slashes() {
        assert_eq!(
            construct_api_url("https://example.test/v1beta/", "/models"),
            "https://example.test/v1beta/models"
        );
        assert_eq!(
            construct_api_url("https://example.test/v1beta", "///models"),
            "https://example.test/v1beta/models"
        );
    }

    #[test]
    fn model_action_url_accepts_resource_names() {
        assert_eq!(
            model_action_url(
                "https://example.test/v1beta/",
                "models/gemini-pro-vision",
                "streamGenerateContent"
            ),
            "https://example.test/v1beta/models/gemini-pro-vision:streamGenerateContent"
        );
    }
}
