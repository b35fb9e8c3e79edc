//! Acquiring the model API key from the environment or the user.
use std::io::Write;

use rustyline::error::ReadlineError;

use super::input::LineSource;
use crate::core::error::CredentialError;

/// Keys issued for the Gemini API start with this. The check is only
/// advisory: an unusual key triggers a warning and a confirmation.
pub const EXPECTED_KEY_PREFIX: &str = "AIzaSy";

pub const API_KEY_URL: &str = "https://makersuite.google.com/app/apikey";

/// Removes all whitespace, pasted keys often pick some up.
pub fn sanitize_api_key(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn has_expected_format(key: &str) -> bool {
    key.starts_with(EXPECTED_KEY_PREFIX)
}

fn prompt_line<L: LineSource>(input: &mut L, prompt: &str) -> Result<String, CredentialError> {
    match input.read_line(prompt) {
        Ok(line) => Ok(line),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            Err(CredentialError::Interrupted)
        }
        Err(err) => Err(CredentialError::Prompt(err.to_string())),
    }
}

fn say<W: Write>(out: &mut W, msg: &str) -> Result<(), CredentialError> {
    writeln!(out, "{}", msg).map_err(|err| CredentialError::Prompt(err.to_string()))
}

/// Returns a usable API key. Uses `configured` when set, otherwise
/// asks for one. A key that doesn't look like a Gemini key is only
/// accepted after the user confirms.
pub fn acquire_api_key<L: LineSource, W: Write>(
    configured: Option<&str>,
    input: &mut L,
    out: &mut W,
) -> Result<String, CredentialError> {
    let raw = match configured.filter(|key| !key.trim().is_empty()) {
        Some(key) => key.to_string(),
        None => {
            say(out, "🔑 Google Gemini API Key not found in environment variables.")?;
            say(out, &format!("Get your API key from: {}", API_KEY_URL))?;
            prompt_line(input, "Please enter your Gemini API key: ")?
        }
    };

    let key = sanitize_api_key(&raw);
    if key.is_empty() {
        say(out, "❌ API key is required to run the chatbot!")?;
        return Err(CredentialError::Missing);
    }

    if !has_expected_format(&key) {
        tracing::warn!("API key does not start with {}", EXPECTED_KEY_PREFIX);
        say(
            out,
            &format!(
                "⚠️  Warning: API key format looks unusual. It should start with '{}'",
                EXPECTED_KEY_PREFIX
            ),
        )?;
        let confirm = prompt_line(input, "Continue anyway? (y/n): ")?;
        if confirm.trim().to_lowercase() != "y" {
            return Err(CredentialError::Declined);
        }
    }

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::input::tests::Scripted;

    #[test]
    fn test_sanitize_strips_all_whitespace() {
        assert_eq!(sanitize_api_key("  AIza Sy\tabc\n123 "), "AIzaSyabc123");
    }

    #[test]
    fn test_configured_key_is_used_without_prompting() {
        let mut input = Scripted::new(&[]);
        let mut out = Vec::new();
        let key = acquire_api_key(Some(" AIzaSyConfigured \n"), &mut input, &mut out).unwrap();
        assert_eq!(key, "AIzaSyConfigured");
        assert!(input.prompts.is_empty());
    }

    #[test]
    fn test_prompts_when_not_configured() {
        let mut input = Scripted::new(&["AIzaSyTyped"]);
        let mut out = Vec::new();
        let key = acquire_api_key(None, &mut input, &mut out).unwrap();
        assert_eq!(key, "AIzaSyTyped");
        assert!(String::from_utf8(out).unwrap().contains("not found"));
    }

    #[test]
    fn test_empty_key_is_missing() {
        let mut input = Scripted::new(&["   "]);
        let mut out = Vec::new();
        let err = acquire_api_key(Some(""), &mut input, &mut out).unwrap_err();
        assert!(matches!(err, CredentialError::Missing));
    }

    #[test]
    fn test_unusual_key_confirmed() {
        let mut input = Scripted::new(&["Y"]);
        let mut out = Vec::new();
        let key = acquire_api_key(Some("sk-something"), &mut input, &mut out).unwrap();
        assert_eq!(key, "sk-something");
        assert!(String::from_utf8(out).unwrap().contains("looks unusual"));
        assert_eq!(input.prompts, vec!["Continue anyway? (y/n): "]);
    }

    #[test]
    fn test_unusual_key_declined() {
        let mut input = Scripted::new(&["n"]);
        let mut out = Vec::new();
        let err = acquire_api_key(Some("sk-something"), &mut input, &mut out).unwrap_err();
        assert!(matches!(err, CredentialError::Declined));
    }

    #[test]
    fn test_interrupt_while_prompting() {
        let mut input = Scripted::new(&[]);
        let mut out = Vec::new();
        let err = acquire_api_key(None, &mut input, &mut out).unwrap_err();
        assert!(matches!(err, CredentialError::Interrupted));
    }
}
