//! `era models`: list the models that can serve content generation.

use std::error::Error;

use crate::api::models::{fetch_models, generation_models, model_id};
use crate::api::ModelInfo;

pub async fn list_models(base_url: &str, api_key: &str) -> Result<(), Box<dyn Error>> {
    let client = reqwest::Client::new();
    let models = generation_models(fetch_models(&client, base_url, api_key).await?);

    println!("🤖 Available Gemini Models");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    if models.is_empty() {
        println!("No models support content generation for this key.");
        return Ok(());
    }

    println!("Found {} models:", models.len());
    println!();
    for model in &models {
        for line in describe_model(model) {
            println!("{line}");
        }
        println!();
    }
    Ok(())
}

fn describe_model(model: &ModelInfo) -> Vec<String> {
    let id = model_id(&model.name);
    let mut lines = vec![format!("  • {id}")];
    if let Some(display_name) = model
        .display_name
        .as_deref()
        .filter(|name| !name.is_empty() && *name != id)
    {
        lines.push(format!("    Name: {display_name}"));
    }
    if let Some(description) = model.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("    {description}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_model_skips_redundant_fields() {
        let model = ModelInfo {
            name: "models/gemini-1.5-flash".to_string(),
            display_name: Some("Gemini 1.5 Flash".to_string()),
            description: Some(String::new()),
            supported_generation_methods: vec!["generateContent".to_string()],
        };
        assert_eq!(
            describe_model(&model),
            vec![
                "  • gemini-1.5-flash".to_string(),
                "    Name: Gemini 1.5 Flash".to_string(),
            ]
        );

        let bare = ModelInfo {
            name: "models/embedding-001".to_string(),
            display_name: Some("embedding-001".to_string()),
            description: None,
            supported_generation_methods: Vec::new(),
        };
        assert_eq!(describe_model(&bare), vec!["  • embedding-001".to_string()]);
    }
}
