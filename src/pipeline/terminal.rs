//! User interaction during steps: confirmations and listings

use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Mutex;
use tracing::warn;

pub trait Terminal: Send + Sync {
    /// Ask a yes/no question; anything but an explicit yes declines
    fn confirm(&self, question: &str) -> bool;

    /// Print a line of user-facing output
    fn print(&self, line: &str);
}

/// Stdin/stdout terminal
#[derive(Debug, Clone, Default)]
pub struct StdTerminal {
    assume_yes: bool,
}

impl StdTerminal {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Terminal for StdTerminal {
    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            warn!("No terminal to confirm '{}'; pass --yes to proceed", question);
            return false;
        }

        eprint!("{} [y/N] ", question);
        let _ = io::stderr().flush();
        let mut answer = String::new();
        if stdin.lock().read_line(&mut answer).is_err() {
            return false;
        }
        parse_answer(&answer)
    }

    fn print(&self, line: &str) {
        println!("{}", line);
    }
}

fn parse_answer(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Pre-scripted answers and captured output
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    answers: Mutex<VecDeque<bool>>,
    questions: Mutex<Vec<String>>,
    printed: Mutex<Vec<String>>,
}

impl ScriptedTerminal {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().map(|q| q.clone()).unwrap_or_default()
    }

    pub fn printed(&self) -> Vec<String> {
        self.printed.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Terminal for ScriptedTerminal {
    fn confirm(&self, question: &str) -> bool {
        if let Ok(mut questions) = self.questions.lock() {
            questions.push(question.to_string());
        }
        self.answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .unwrap_or(false)
    }

    fn print(&self, line: &str) {
        if let Ok(mut printed) = self.printed.lock() {
            printed.push(line.to_string());
        }
    }
}
