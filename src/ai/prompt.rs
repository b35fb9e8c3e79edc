//! Reusable prompts using Handlebars for templating. Handlebars adds
//! additional security controls since it can't do much out of the box
//! without registering your own helpers. This is ideal since user
//! input and model output should be considered untrusted and
//! Handlebars forces you to add only what you need.
//!
//! Prompts are plain text sent to the model, so HTML escaping is
//! turned off and every payload value is inserted verbatim. Strict
//! mode is off so a missing payload field renders as empty text
//! rather than failing.

use std::fmt;

use handlebars::Handlebars;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Chat,
    ImageAnalysis,
    ResultsExplanation,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<Prompt> for String {
    fn from(item: Prompt) -> String {
        format!("{:?}", item)
    }
}

/// The sentence the model is told to answer with when a question is
/// outside of the disease and health domain.
pub const DOMAIN_RESTRICTION: &str = "I'm sorry, I can only assist with disease and health-related questions. Please ask me something about medical conditions, symptoms, or health concerns.";

pub const IMAGE_DISCLAIMER: &str = "IMPORTANT DISCLAIMER: Remind the user that this is an AI analysis and NOT a replacement for professional medical diagnosis. They should consult a qualified radiologist or physician for accurate diagnosis.";

const PERSONA_PARTIAL: &str = "Persona";
const DOMAIN_RESTRICTION_PARTIAL: &str = "DomainRestriction";
const IMAGE_DISCLAIMER_PARTIAL: &str = "ImageDisclaimer";

const PERSONA: &str = r#"You are a medical assistant specialized in diseases and health conditions.
You ONLY answer questions related to:
- Diseases, symptoms, and medical conditions
- Health-related queries
- Medical terminology and explanations
- Treatment information (general, not prescriptive)
- Prevention and health tips

If a user asks about anything NOT related to diseases or health, politely redirect them by saying: "{{> DomainRestriction}}"

Always provide helpful, accurate medical information but remind users to consult healthcare professionals for diagnosis and treatment.
Keep responses clear, concise, and educational."#;

const CHAT_PROMPT: &str = r"{{> Persona}}

User: {{user_message}}
Assistant:";

const IMAGE_ANALYSIS_PROMPT: &str = r"You are an expert medical imaging AI assistant. Analyze this X-ray image carefully and provide:

1. Image Quality Assessment: Comment on the quality and clarity of the X-ray
2. Anatomical Region: Identify what body part is shown
3. Findings: Describe any abnormalities, suspicious areas, or concerning patterns you observe
4. Potential Conditions: List possible diseases or conditions that might be indicated such as pneumonia, tuberculosis, fractures, tumors, etc
5. Confidence Level: Rate your confidence in the findings as Low, Medium, or High
6. Recommendation: Suggest whether immediate medical attention is needed

{{> ImageDisclaimer}}

Format your response clearly with these sections.";

const RESULTS_EXPLANATION_PROMPT: &str = r"You are a compassionate medical AI assistant. A machine learning model has analyzed an X-ray image and produced the following results:

{{results}}

Please provide a clear, empathetic explanation of these results for the patient. Include:

1. Main Finding Summary: Explain the top finding in simple terms
2. Risk Assessment: Explain what the probability percentages mean
3. Key Concerns: Highlight findings that need immediate attention (High Risk and above)
4. Recommendations: Summarize the recommended actions in priority order
5. Next Steps: What the patient should do next
6. Reassurance: Provide appropriate reassurance while being honest

Use simple, non-technical language that a patient can understand. Be empathetic and supportive. Always emphasize that these are AI-generated results and they should consult with a healthcare professional for proper diagnosis and treatment.

Format your response in a friendly, conversational tone.";

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(false);
    registry.register_escape_fn(handlebars::no_escape);
    registry
        .register_partial(DOMAIN_RESTRICTION_PARTIAL, DOMAIN_RESTRICTION)
        .expect("Failed to register partial");
    registry
        .register_partial(IMAGE_DISCLAIMER_PARTIAL, IMAGE_DISCLAIMER)
        .expect("Failed to register partial");
    registry
        .register_partial(PERSONA_PARTIAL, PERSONA)
        .expect("Failed to register partial");
    registry
        .register_template_string(&Prompt::Chat.to_string(), CHAT_PROMPT)
        .expect("Failed to register template");
    registry
        .register_template_string(&Prompt::ImageAnalysis.to_string(), IMAGE_ANALYSIS_PROMPT)
        .expect("Failed to register template");
    registry
        .register_template_string(
            &Prompt::ResultsExplanation.to_string(),
            RESULTS_EXPLANATION_PROMPT,
        )
        .expect("Failed to register template");
    registry
}

/// The registered prompt templates. Rendering never fails: absent
/// payload fields become empty text.
pub struct PromptTemplates {
    registry: Handlebars<'static>,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            registry: templates(),
        }
    }
}

impl PromptTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&self, prompt: Prompt, payload: &Value) -> String {
        // All templates are static and non-strict so the only way to
        // fail is a broken template, which the tests below catch.
        self.registry
            .render(&prompt.to_string(), payload)
            .expect("Failed to render prompt template")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_contains_user_message_and_restriction() {
        let prompts = PromptTemplates::new();
        let inputs = [
            "What are the symptoms of flu?",
            "X",
            "héllo wörld ✅",
            r#"quotes " and <tags> & ampersands"#,
            "{{user_message}} braces are not re-evaluated",
        ];
        for input in inputs {
            let rendered = prompts.render(Prompt::Chat, &json!({ "user_message": input }));
            assert!(rendered.contains(input), "missing input in: {}", rendered);
            assert!(rendered.contains(DOMAIN_RESTRICTION));
        }
    }

    #[test]
    fn test_chat_layout() {
        let prompts = PromptTemplates::new();
        let rendered = prompts.render(Prompt::Chat, &json!({ "user_message": "Hi" }));
        assert!(rendered.starts_with("You are a medical assistant"));
        assert!(rendered.ends_with("User: Hi\nAssistant:"));
    }

    #[test]
    fn test_absent_fields_render_empty() {
        let prompts = PromptTemplates::new();
        let rendered = prompts.render(Prompt::Chat, &json!({}));
        assert!(rendered.ends_with("User: \nAssistant:"));

        let rendered = prompts.render(Prompt::ResultsExplanation, &Value::Null);
        assert!(rendered.contains("produced the following results:"));
    }

    #[test]
    fn test_image_analysis_has_sections_and_disclaimer() {
        let prompts = PromptTemplates::new();
        let rendered = prompts.render(Prompt::ImageAnalysis, &json!({}));
        for section in [
            "1. Image Quality Assessment",
            "2. Anatomical Region",
            "3. Findings",
            "4. Potential Conditions",
            "5. Confidence Level",
            "6. Recommendation",
        ] {
            assert!(rendered.contains(section), "missing {}", section);
        }
        assert!(rendered.contains(IMAGE_DISCLAIMER));
    }

    #[test]
    fn test_results_are_embedded_verbatim() {
        let prompts = PromptTemplates::new();
        let results = r#"{"finding":"Pneumonia","probability":0.82}"#;
        let rendered = prompts.render(Prompt::ResultsExplanation, &json!({ "results": results }));
        assert!(rendered.contains(results));
        assert!(rendered.contains("6. Reassurance"));
    }

    #[test]
    fn test_results_payload_is_not_parsed() {
        let prompts = PromptTemplates::new();
        let results = "not json at all {\n  \"unterminated\": ";
        let rendered = prompts.render(Prompt::ResultsExplanation, &json!({ "results": results }));
        assert!(rendered.contains(results));
    }

    #[test]
    fn test_prompt_names() {
        assert_eq!(String::from(Prompt::Chat), "Chat");
        assert_eq!(Prompt::ResultsExplanation.to_string(), "ResultsExplanation");
    }
}
