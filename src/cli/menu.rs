//! The interactive menu loop.
use std::io::Write;
use std::path::Path;

use anyhow::Result;

use super::input::{LineSource, next_line, read_pasted, read_results_file};
use crate::ai::chat::ConversationEngine;
use crate::core::error::EngineError;

const BACK: &str = "back";
const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Chat,
    AnalyzeImage,
    ExplainResults,
    ClearHistory,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Chat),
            "2" => Some(MenuChoice::AnalyzeImage),
            "3" => Some(MenuChoice::ExplainResults),
            "4" => Some(MenuChoice::ClearHistory),
            "5" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// How the menu loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuExit {
    Quit,
    Interrupted,
}

/// Formats an engine result for display. This is the only place
/// errors turn into text.
pub fn present(result: Result<String, EngineError>) -> String {
    match result {
        Ok(reply) => reply,
        Err(err) => err.to_string(),
    }
}

fn is_back(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(BACK)
}

fn rule(ch: char) -> String {
    ch.to_string().repeat(RULE_WIDTH)
}

pub fn print_header<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "\n{}", rule('='))?;
    writeln!(out, "🏥  DISEASE ANALYZER CHATBOT  🏥")?;
    writeln!(out, "    Powered by Google Gemini AI")?;
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "\nFeatures:")?;
    writeln!(out, "  • Ask questions about diseases and symptoms")?;
    writeln!(out, "  • Analyze X-ray images for disease detection")?;
    writeln!(out, "  • Explain ML model results in simple terms")?;
    writeln!(out, "{}\n", rule('='))?;
    Ok(())
}

fn print_menu<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "\n📋 OPTIONS:")?;
    writeln!(out, "  1. Chat about diseases")?;
    writeln!(out, "  2. Analyze X-ray image with AI")?;
    writeln!(out, "  3. Explain ML model results (JSON)")?;
    writeln!(out, "  4. Clear chat history")?;
    writeln!(out, "  5. Exit")?;
    writeln!(out, "{}", "-".repeat(40))?;
    Ok(())
}

fn print_result<W: Write>(out: &mut W, title: &str, body: &str) -> Result<()> {
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "{}", body)?;
    writeln!(out, "{}", rule('='))?;
    Ok(())
}

/// Runs the menu until the user exits or interrupts.
pub async fn run<L: LineSource, W: Write>(
    engine: &mut ConversationEngine,
    input: &mut L,
    out: &mut W,
) -> Result<MenuExit> {
    print_header(out)?;

    loop {
        print_menu(out)?;
        let Some(choice) = next_line(input, "Enter your choice (1-5): ")? else {
            return Ok(MenuExit::Interrupted);
        };

        let finished = match MenuChoice::parse(&choice) {
            Some(MenuChoice::Chat) => chat_mode(engine, input, out).await?,
            Some(MenuChoice::AnalyzeImage) => image_mode(engine, input, out).await?,
            Some(MenuChoice::ExplainResults) => results_mode(engine, input, out).await?,
            Some(MenuChoice::ClearHistory) => {
                engine.clear_history();
                writeln!(out, "✅ Chat history has been cleared!")?;
                None
            }
            Some(MenuChoice::Exit) => {
                writeln!(out, "\n👋 Thank you for using Disease Analyzer Chatbot!")?;
                writeln!(out, "Stay healthy! 🏥\n")?;
                Some(MenuExit::Quit)
            }
            None => {
                writeln!(
                    out,
                    "❌ Invalid choice! Please enter a number between 1 and 5."
                )?;
                None
            }
        };

        if let Some(exit) = finished {
            return Ok(exit);
        }
    }
}

// Each mode returns `Some(MenuExit::Interrupted)` when input ends
// and `None` to go back to the menu.

async fn chat_mode<L: LineSource, W: Write>(
    engine: &mut ConversationEngine,
    input: &mut L,
    out: &mut W,
) -> Result<Option<MenuExit>> {
    writeln!(out, "\n💬 CHAT MODE")?;
    writeln!(out, "Ask me anything about diseases and health!")?;
    writeln!(out, "Type 'back' to return to main menu\n")?;
    writeln!(out, "{}", "-".repeat(40))?;

    loop {
        let Some(line) = next_line(input, "\n👤 You: ")? else {
            return Ok(Some(MenuExit::Interrupted));
        };
        let message = line.trim();

        if is_back(message) {
            return Ok(None);
        }
        if message.is_empty() {
            writeln!(out, "⚠️  Please enter a message!")?;
            continue;
        }

        let reply = present(engine.chat(message).await);
        writeln!(out, "\n🤖 Assistant: {}", reply)?;
    }
}

async fn image_mode<L: LineSource, W: Write>(
    engine: &ConversationEngine,
    input: &mut L,
    out: &mut W,
) -> Result<Option<MenuExit>> {
    writeln!(out, "\n🔬 X-RAY ANALYSIS MODE")?;
    writeln!(out, "Enter the path to your X-ray image")?;
    writeln!(out, "Type 'back' to return to main menu\n")?;
    writeln!(out, "{}", "-".repeat(40))?;

    let Some(line) = next_line(input, "\n📁 Image path: ")? else {
        return Ok(Some(MenuExit::Interrupted));
    };
    let image_path = line.trim();

    if is_back(image_path) {
        return Ok(None);
    }
    if image_path.is_empty() {
        writeln!(out, "⚠️  Please enter an image path!")?;
        return Ok(None);
    }

    writeln!(out, "\n⏳ Analyzing X-ray image... Please wait...\n")?;
    let result = present(engine.analyze_image(Path::new(image_path)).await);
    print_result(out, "📊 ANALYSIS RESULTS", &result)?;
    Ok(None)
}

async fn results_mode<L: LineSource, W: Write>(
    engine: &ConversationEngine,
    input: &mut L,
    out: &mut W,
) -> Result<Option<MenuExit>> {
    writeln!(out, "\n🧠 ML MODEL RESULTS EXPLANATION")?;
    writeln!(out, "Paste your ML model JSON results or provide file path")?;
    writeln!(out, "Type 'back' to return to main menu\n")?;
    writeln!(out, "{}", "-".repeat(40))?;
    writeln!(out, "\nChoose input method:")?;
    writeln!(out, "  1. Paste JSON directly")?;
    writeln!(out, "  2. Provide JSON file path")?;

    let Some(method) = next_line(input, "\nEnter choice (1-2): ")? else {
        return Ok(Some(MenuExit::Interrupted));
    };

    let raw_results = match method.trim() {
        "1" => {
            writeln!(
                out,
                "\n📋 Paste your JSON results below (press Enter twice when done):"
            )?;
            let Some(pasted) = read_pasted(input)? else {
                return Ok(Some(MenuExit::Interrupted));
            };
            if pasted.trim().is_empty() {
                writeln!(out, "⚠️  No JSON data provided!")?;
                return Ok(None);
            }
            pasted
        }
        "2" => {
            let Some(line) = next_line(input, "\n📁 JSON file path: ")? else {
                return Ok(Some(MenuExit::Interrupted));
            };
            let path = line.trim();
            if is_back(path) {
                return Ok(None);
            }
            if path.is_empty() {
                writeln!(out, "⚠️  Please enter a file path!")?;
                return Ok(None);
            }
            match read_results_file(Path::new(path)) {
                Ok(contents) => contents,
                Err(err) => {
                    writeln!(out, "❌ Error: {}", err)?;
                    return Ok(None);
                }
            }
        }
        other if is_back(other) => return Ok(None),
        _ => {
            writeln!(out, "❌ Invalid choice!")?;
            return Ok(None);
        }
    };

    writeln!(out, "\n⏳ Analyzing ML results... Please wait...\n")?;
    let explanation = present(engine.explain_results(&raw_results).await);
    print_result(out, "💡 ML RESULTS EXPLANATION", &explanation)?;
    Ok(None)
}
