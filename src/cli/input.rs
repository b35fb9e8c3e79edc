//! Line oriented terminal input.
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::core::error::InputError;

/// Something that hands out lines of user input. The terminal uses
/// `rustyline`, tests use a scripted list of lines.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadlineError>;
}

impl LineSource for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        let line = self.readline(prompt)?;
        if !line.trim().is_empty() {
            // History is a convenience, failing to record it is fine
            let _ = self.add_history_entry(line.as_str());
        }
        Ok(line)
    }
}

/// Reads the next line. Returns `None` when the user interrupts with
/// Ctrl-C or closes the input with Ctrl-D.
pub fn next_line<L: LineSource>(input: &mut L, prompt: &str) -> Result<Option<String>> {
    match input.read_line(prompt) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Collects pasted lines until a blank line. Blank lines before any
/// content are skipped. Returns `None` on interrupt.
pub fn read_pasted<L: LineSource>(input: &mut L) -> Result<Option<String>> {
    let mut lines: Vec<String> = Vec::new();
    loop {
        let Some(line) = next_line(input, "")? else {
            return Ok(None);
        };
        if line.trim().is_empty() {
            if lines.is_empty() {
                continue;
            }
            break;
        }
        lines.push(line);
    }
    Ok(Some(lines.join("\n")))
}

/// Reads a results file as opaque text.
pub fn read_results_file(path: &Path) -> Result<String, InputError> {
    let contents = fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => InputError::FileNotFound(path.to_path_buf()),
        _ => InputError::ReadFile {
            path: path.to_path_buf(),
            reason: err.to_string(),
        },
    })?;
    if contents.trim().is_empty() {
        return Err(InputError::Empty("results"));
    }
    Ok(contents)
}
