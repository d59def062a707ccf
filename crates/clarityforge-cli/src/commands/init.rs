//! The `clarityforge init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("clarityforge.toml").exists() {
        println!("clarityforge.toml already exists, skipping.");
    } else {
        std::fs::write("clarityforge.toml", SAMPLE_CONFIG)?;
        println!("Created clarityforge.toml");
    }

    println!("\nNext steps:");
    println!("  1. Export GEMINI_API_KEY (or edit clarityforge.toml)");
    println!("  2. Run: clarityforge analyze --topic \"Entropy\" --file my-explanation.txt");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# clarityforge configuration

# "gemini" or "openai"
provider = "gemini"
model = "gemini-3-pro-preview"
api_key = "${GEMINI_API_KEY}"

# base_url = "https://generativelanguage.googleapis.com"
thinking_budget = 32768
timeout_secs = 120
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use clarityforge_providers::{load_config_from, ProviderKind};

    #[test]
    fn sample_config_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clarityforge.toml");
        std::fs::write(&path, SAMPLE_CONFIG).unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.provider, ProviderKind::Gemini);
        assert_eq!(config.model, "gemini-3-pro-preview");
        assert_eq!(config.thinking_budget, 32768);
        assert_eq!(config.timeout_secs, 120);
    }
}
