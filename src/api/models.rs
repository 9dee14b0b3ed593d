use crate::api::{ModelInfo, ModelsResponse};
use crate::core::chat_stream::format_api_error;
use crate::utils::url::construct_api_url;

pub const GENERATE_CONTENT_METHOD: &str = "generateContent";

pub async fn fetch_models(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
) -> Result<Vec<ModelInfo>, Box<dyn std::error::Error>> {
    let models_url = construct_api_url(base_url, "models");
    let mut models = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let mut request = client
            .get(&models_url)
            .header("x-goog-api-key", api_key);
        if let Some(token) = &page_token {
            request = request.query(&[("pageToken", token.as_str())]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(format!(
                "Model listing failed with status {status}: {}",
                format_api_error(&error_text)
            )
            .into());
        }

        let page = response.json::<ModelsResponse>().await?;
        models.extend(page.models);
        match page.next_page_token.filter(|token| !token.is_empty()) {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    Ok(models)
}

/// Keep only models that can serve `generateContent`, sorted by id.
pub fn generation_models(models: Vec<ModelInfo>) -> Vec<ModelInfo> {
    let mut models: Vec<ModelInfo> = models
        .into_iter()
        .filter(|model| {
            model
                .supported_generation_methods
                .iter()
                .any(|method| method == GENERATE_CONTENT_METHOD)
        })
        .collect();
    models.sort_by(|a, b| model_id(&a.name).cmp(model_id(&b.name)));
    models
}

/// `models/gemini-pro` → `gemini-pro`
pub fn model_id(name: &str) -> &str {
    name.strip_prefix("models/").unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(name: &str, methods: &[&str]) -> ModelInfo {
        ModelInfo {
            name: name.to_string(),
            display_name: None,
            description: None,
            supported_generation_methods: methods.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn generation_models_filters_and_sorts() {
        let models = vec![
            model("models/text-embedding-004", &["embedContent"]),
            model("models/gemini-pro", &["generateContent", "countTokens"]),
            model("models/gemini-1.5-flash", &["generateContent"]),
        ];

        let filtered = generation_models(models);
        let ids: Vec<&str> = filtered.iter().map(|m| model_id(&m.name)).collect();
        assert_eq!(ids, vec!["gemini-1.5-flash", "gemini-pro"]);
    }

    #[test]
    fn model_id_strips_resource_prefix() {
        assert_eq!(model_id("models/gemini-pro"), "gemini-pro");
        assert_eq!(model_id("gemini-pro"), "gemini-pro");
    }
}
