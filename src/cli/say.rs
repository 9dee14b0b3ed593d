//! TUI-less `say` and `describe` commands

use std::error::Error;
use std::path::Path;

use crate::core::client::GenerationService;
use crate::core::formatter::to_markdown;
use crate::core::upload::ImageUpload;
use crate::ui::markdown::render_markdown;
use crate::ui::theme::Theme;

pub async fn run_say(
    service: &dyn GenerationService,
    prompt: &str,
    markdown: bool,
) -> Result<(), Box<dyn Error>> {
    if prompt.trim().is_empty() {
        return Err("Usage: era say <prompt>".into());
    }

    let result = service.generate_content(prompt).await?;
    print_lines(&output_lines(&result.text, markdown));
    Ok(())
}

pub async fn run_describe(
    service: &dyn GenerationService,
    image: &Path,
    prompt: &str,
    extra: Option<&str>,
    markdown: bool,
) -> Result<(), Box<dyn Error>> {
    if prompt.trim().is_empty() {
        return Err("Usage: era describe <image> <prompt>".into());
    }

    let upload = ImageUpload::from_path(image)?;
    eprintln!("🖼  {}", upload.caption());
    let extra = extra.filter(|text| !text.trim().is_empty());
    let result = service
        .generate_content_multimodal(prompt, extra, &upload)
        .await?;
    print_lines(&output_lines(&result.text, markdown));
    Ok(())
}

/// The formatted quote, rendered as plain terminal text.
fn output_lines(text: &str, markdown: bool) -> Vec<String> {
    let quote = to_markdown(text);
    if !markdown {
        return quote.lines().map(str::to_owned).collect();
    }
    render_markdown(&quote, &Theme::dark_default())
        .into_iter()
        .map(|line| line.to_string())
        .collect()
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::upload::sample_png;
    use crate::utils::test_utils::{FakeCall, FakeService};
    use tempfile::TempDir;

    #[test]
    fn raw_output_keeps_quote_markers() {
        assert_eq!(
            output_lines("one\ntwo", false),
            vec!["> one".to_string(), "> two".to_string()]
        );
    }

    #[test]
    fn markdown_output_draws_quote_bar() {
        let lines = output_lines("Hello *there*", true);
        assert_eq!(lines, vec!["│ Hello there".to_string()]);
    }

    #[tokio::test]
    async fn say_rejects_blank_prompt_without_calling() {
        let service = FakeService::replying("unused");
        assert!(run_say(&service, "   ", false).await.is_err());
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn describe_sends_prompt_extra_and_image() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("kite.png");
        std::fs::write(&path, sample_png(2, 2)).expect("write");

        let service = FakeService::replying("A kite");
        run_describe(&service, &path, "What is this?", Some(" "), false)
            .await
            .expect("describe");

        assert_eq!(
            service.calls(),
            vec![FakeCall::Multimodal {
                prompt: "What is this?".to_string(),
                secondary: None,
                image: "kite.png".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn describe_surfaces_api_errors() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("kite.png");
        std::fs::write(&path, sample_png(2, 2)).expect("write");

        let service = FakeService::failing("API Error: quota exceeded");
        let err = run_describe(&service, &path, "What?", None, false)
            .await
            .expect_err("failure");
        assert_eq!(err.to_string(), "API Error: quota exceeded");
    }
}
