//! Operator interaction
//!
//! The `Prompter` trait is the only way the run reads operator input, so
//! conflict resolution can be driven by scripted answers in tests.

use std::collections::VecDeque;
use std::io::{self, IsTerminal as _};
use tracing::warn;

/// Source of operator answers and sink for text shown to the operator
pub trait Prompter {
    /// Ask `question`, returning the raw answer (`default` on empty input)
    fn ask(&mut self, question: &str, default: &str) -> io::Result<String>;

    /// Show a block of text, such as a diff
    fn show(&mut self, text: &str);
}

/// Interactive prompter backed by the terminal
///
/// When stdin is not a terminal every question is answered with its
/// default so the process never hangs waiting for input.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, question: &str, default: &str) -> io::Result<String> {
        if !io::stdin().is_terminal() {
            warn!("{question} (no terminal, answering '{default}')");
            return Ok(default.to_owned());
        }

        dialoguer::Input::<String>::new()
            .with_prompt(question)
            .default(default.to_owned())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| io::Error::other(e.to_string()))
    }

    fn show(&mut self, text: &str) {
        println!("{text}");
    }
}

/// Prompter answering from a fixed script, for tests and automation
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    questions: Vec<String>,
    shown: Vec<String>,
}

impl ScriptedPrompter {
    /// Answers are consumed in order, one per question
    #[must_use]
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            questions: Vec::new(),
            shown: Vec::new(),
        }
    }

    /// Questions asked so far
    #[must_use]
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Text blocks shown so far
    #[must_use]
    pub fn shown(&self) -> &[String] {
        &self.shown
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str, default: &str) -> io::Result<String> {
        self.questions.push(question.to_owned());
        let answer = self.answers.pop_front().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("No scripted answer left for: {question}"),
            )
        })?;
        if answer.trim().is_empty() {
            Ok(default.to_owned())
        } else {
            Ok(answer)
        }
    }

    fn show(&mut self, text: &str) {
        self.shown.push(text.to_owned());
    }
}
