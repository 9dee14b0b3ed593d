use crate::core::config::data::{path_display, Config};

fn show(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(value) => value.to_string(),
        None => format!("{fallback} (default)"),
    }
}

impl Config {
    pub fn render_all(&self) -> Vec<String> {
        vec![
            format!(
                "  text-model: {}",
                show(self.text_model.as_deref(), self.text_model())
            ),
            format!(
                "  vision-model: {}",
                show(self.vision_model.as_deref(), self.vision_model())
            ),
            format!("  base-url: {}", show(self.base_url.as_deref(), self.base_url())),
            format!(
                "  default-page: {}",
                show(
                    self.default_page.as_deref(),
                    self.default_mode().config_key()
                )
            ),
            format!("  theme: {}", show(self.theme.as_deref(), "dark")),
            format!(
                "  markdown: {}",
                if self.markdown_enabled() { "on" } else { "off" }
            ),
        ]
    }

    pub fn print_all(&self) {
        match Config::get_config_path() {
            Ok(path) => println!("Current configuration ({}):", path_display(path)),
            Err(_) => println!("Current configuration:"),
        }
        for line in self.render_all() {
            println!("{line}");
        }
    }
}
