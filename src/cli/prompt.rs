//! Interactive console input
//!
//! Every interactive flow reads through the `Prompt` trait so it can run
//! against a terminal or a scripted sequence of answers.

use std::io::{self, BufRead, Write};

use crate::crypto::SecureString;
use crate::error::{BookkeeperError, BookkeeperResult};

/// Source of user answers and sink for messages
pub trait Prompt {
    /// Ask for one line of visible input (trimmed)
    fn line(&mut self, prompt: &str) -> BookkeeperResult<String>;

    /// Ask for input that must not be echoed
    fn secret(&mut self, prompt: &str) -> BookkeeperResult<SecureString>;

    /// Show a message
    fn say(&mut self, message: &str);

    /// Ask a yes/no question; anything but yes counts as no
    fn confirm(&mut self, question: &str) -> BookkeeperResult<bool> {
        let answer = self.line(&format!("{} [y/N]: ", question))?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }
}

/// Prompt on stdin/stdout, with masked password entry
#[derive(Debug, Default)]
pub struct ConsolePrompt;

impl ConsolePrompt {
    pub fn new() -> Self {
        Self
    }
}

impl Prompt for ConsolePrompt {
    fn line(&mut self, prompt: &str) -> BookkeeperResult<String> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut input = String::new();
        let read = io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            return Err(BookkeeperError::Aborted("end of input".into()));
        }

        Ok(input.trim().to_string())
    }

    fn secret(&mut self, prompt: &str) -> BookkeeperResult<SecureString> {
        rpassword::prompt_password(prompt)
            .map(SecureString::from)
            .map_err(|e| BookkeeperError::Io(format!("Failed to read password: {}", e)))
    }

    fn say(&mut self, message: &str) {
        println!("{}", message);
    }
}

/// Prompt that replays canned answers and records everything shown
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: std::collections::VecDeque<String>,
    /// Prompts and messages in the order they appeared
    pub transcript: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    /// Whether any recorded prompt or message contains `needle`
    pub fn saw(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }

    fn next(&mut self, prompt: &str) -> BookkeeperResult<String> {
        self.transcript.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| BookkeeperError::Aborted("script exhausted".into()))
    }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
    fn line(&mut self, prompt: &str) -> BookkeeperResult<String> {
        self.next(prompt).map(|s| s.trim().to_string())
    }

    fn secret(&mut self, prompt: &str) -> BookkeeperResult<SecureString> {
        self.next(prompt).map(SecureString::from)
    }

    fn say(&mut self, message: &str) {
        self.transcript.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_accepts_yes_only() {
        let mut prompt = ScriptedPrompt::new(["y", "YES", "", "n", "ja"]);
        assert!(prompt.confirm("Proceed?").unwrap());
        assert!(prompt.confirm("Proceed?").unwrap());
        assert!(!prompt.confirm("Proceed?").unwrap());
        assert!(!prompt.confirm("Proceed?").unwrap());
        assert!(!prompt.confirm("Proceed?").unwrap());
        assert!(prompt.saw("Proceed? [y/N]: "));
    }

    #[test]
    fn test_exhausted_script_aborts() {
        let mut prompt = ScriptedPrompt::new(Vec::<String>::new());
        assert!(prompt.line("Name: ").unwrap_err().is_aborted());
    }
}
