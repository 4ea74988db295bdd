use anyhow::{anyhow, Result};

/// How the assistant voices its answers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoiceSetting {
    /// System voice via the OS (macOS `say`, `espeak` elsewhere).
    Local,
    /// Hosted synthesis, played back locally.
    Hosted,
    Off,
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Key shared by the transcription and hosted-TTS services.
    pub groq_api_key: String,
    /// Base URL of the QA service that owns the email corpus.
    pub qa_base_url: String,
    pub voice: VoiceSetting,
}

impl Settings {
    pub fn load() -> Result<Self> {
        load_dotenv();

        let groq_api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| anyhow!("GROQ_API_KEY not found. Please set it as an environment variable"))?;

        let qa_base_url = std::env::var("MAILQA_BASE_URL")
            .unwrap_or_else(|_| mailqa::providers::http::DEFAULT_BASE_URL.to_string());

        let voice = match std::env::var("MAILWALK_VOICE").as_deref() {
            Ok("hosted") => VoiceSetting::Hosted,
            Ok("off") => VoiceSetting::Off,
            _ => VoiceSetting::Local,
        };

        Ok(Self {
            groq_api_key,
            qa_base_url,
            voice,
        })
    }
}

/// Load environment variables from a `.env` near the working directory,
/// best-effort, without clobbering anything already exported.
pub fn load_dotenv() {
    for path in [".env", "../.env", "../../.env"] {
        if let Ok(content) = std::fs::read_to_string(path) {
            apply_env_file(&content);
        }
    }
}

fn apply_env_file(content: &str) {
    for line in content.lines() {
        if let Some((key, value)) = parse_env_line(line) {
            if std::env::var(&key).is_err() {
                unsafe {
                    std::env::set_var(key, value);
                }
            }
        }
    }
}

fn parse_env_line(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    let value = value.trim().trim_matches('"').trim_matches('\'');
    Some((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_blanks() {
        assert_eq!(parse_env_line("# comment"), None);
        assert_eq!(parse_env_line("   "), None);
        assert_eq!(parse_env_line("=value"), None);
    }

    #[test]
    fn strips_quotes_from_values() {
        assert_eq!(
            parse_env_line(r#"GROQ_API_KEY="abc123""#),
            Some(("GROQ_API_KEY".into(), "abc123".into()))
        );
        assert_eq!(
            parse_env_line("MAILQA_BASE_URL='http://localhost:8787'"),
            Some(("MAILQA_BASE_URL".into(), "http://localhost:8787".into()))
        );
    }

    #[test]
    fn keeps_equals_signs_inside_values() {
        assert_eq!(
            parse_env_line("TOKEN=a=b=c"),
            Some(("TOKEN".into(), "a=b=c".into()))
        );
    }

    #[test]
    fn exported_variables_survive_a_dotenv_redefinition() {
        unsafe {
            std::env::set_var("MAILWALK_TEST_KEEP", "exported");
            std::env::remove_var("MAILWALK_TEST_FILL");
        }

        apply_env_file("MAILWALK_TEST_KEEP=from_file\nMAILWALK_TEST_FILL=from_file\n");

        assert_eq!(std::env::var("MAILWALK_TEST_KEEP").unwrap(), "exported");
        assert_eq!(std::env::var("MAILWALK_TEST_FILL").unwrap(), "from_file");

        unsafe {
            std::env::remove_var("MAILWALK_TEST_KEEP");
            std::env::remove_var("MAILWALK_TEST_FILL");
        }
    }
}
