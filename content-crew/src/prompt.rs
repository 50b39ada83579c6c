//! Line-based terminal prompting.
//!
//! [`Prompter`] has one required method, [`Prompter::read_line`]; every question type (required,
//! optional, comma-separated list, multi-line, yes/no) is built on top of it. The terminal
//! implementation reads stdin; tests drive the same question logic from a script.

use std::io::{self, Write};

use console::style;
use content_crew_core::brief::parse_list;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    /// The user closed the input (Ctrl-D) instead of answering.
    #[error("input cancelled by user")]
    Cancelled,
    #[error("failed to read from terminal: {0}")]
    Io(#[from] io::Error),
}

pub trait Prompter {
    /// Shows `prompt` and returns the entered line without its trailing newline.
    /// End of input is [`PromptError::Cancelled`].
    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError>;

    /// Prints a line of guidance or feedback that needs no answer.
    fn notice(&mut self, text: &str);

    fn section(&mut self, title: &str) {
        self.notice("");
        self.notice(&format!("--- {title} ---"));
    }

    fn ask_required(&mut self, question: &str) -> Result<String, PromptError> {
        loop {
            let answer = self.read_line(&format!("{question} (Required): "))?;
            let answer = answer.trim();
            if !answer.is_empty() {
                return Ok(answer.to_string());
            }
            self.notice("This field is required.");
        }
    }

    /// Reads lines until an empty line; at least one line of text is required.
    fn ask_required_multiline(&mut self, question: &str) -> Result<String, PromptError> {
        self.notice(&format!(
            "{question} (Required): press Enter for a new line, an empty line to finish"
        ));
        let mut lines: Vec<String> = Vec::new();
        loop {
            let line = self.read_line("> ")?;
            if line.trim().is_empty() {
                if lines.is_empty() {
                    self.notice("This field is required.");
                    continue;
                }
                return Ok(lines.join("\n"));
            }
            lines.push(line.trim_end().to_string());
        }
    }

    fn ask_optional(&mut self, question: &str) -> Result<Option<String>, PromptError> {
        let answer = self.read_line(&format!("{question} (Optional, press Enter to skip): "))?;
        let answer = answer.trim();
        Ok((!answer.is_empty()).then(|| answer.to_string()))
    }

    fn ask_optional_list(&mut self, question: &str) -> Result<Option<Vec<String>>, PromptError> {
        let answer = self.read_line(&format!("{question} (Optional, comma-separated list): "))?;
        Ok(parse_list(&answer))
    }

    fn ask_with_default(&mut self, question: &str, default: &str) -> Result<String, PromptError> {
        let answer = self.read_line(&format!("{question} [{default}]: "))?;
        let answer = answer.trim();
        Ok(if answer.is_empty() {
            default.to_string()
        } else {
            answer.to_string()
        })
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool, PromptError> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let answer = self.read_line(&format!("{question} {hint} "))?;
            match answer.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.notice("Please answer y or n."),
            }
        }
    }
}

/// Prompts on stdout, reads answers from stdin.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        print!("{}", style(prompt).cyan());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            println!();
            return Err(PromptError::Cancelled);
        }
        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }

    fn notice(&mut self, text: &str) {
        println!("{text}");
    }

    fn section(&mut self, title: &str) {
        println!();
        println!("{}", style(format!("--- {title} ---")).bold().cyan());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Script {
        answers: VecDeque<&'static str>,
        notices: Vec<String>,
    }

    impl Script {
        fn new(answers: &[&'static str]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                notices: Vec::new(),
            }
        }
    }

    impl Prompter for Script {
        fn read_line(&mut self, _prompt: &str) -> Result<String, PromptError> {
            self.answers
                .pop_front()
                .map(str::to_string)
                .ok_or(PromptError::Cancelled)
        }

        fn notice(&mut self, text: &str) {
            self.notices.push(text.to_string());
        }
    }

    #[test]
    fn required_questions_repeat_until_answered() {
        let mut script = Script::new(&["", "  ", " Trail Buddy "]);
        assert_eq!(script.ask_required("Product").unwrap(), "Trail Buddy");
        assert_eq!(
            script.notices.iter().filter(|n| *n == "This field is required.").count(),
            2
        );
    }

    #[test]
    fn multiline_stops_at_first_empty_line_after_text() {
        let mut script = Script::new(&["", "first line", "second line  ", "", "unused"]);
        assert_eq!(
            script.ask_required_multiline("Description").unwrap(),
            "first line\nsecond line"
        );
        assert_eq!(script.answers.len(), 1);
    }

    #[test]
    fn optional_answers_map_blank_to_none() {
        let mut script = Script::new(&["", " Europe ", "a, ,b", ""]);
        assert_eq!(script.ask_optional("Market").unwrap(), None);
        assert_eq!(script.ask_optional("Market").unwrap(), Some("Europe".into()));
        assert_eq!(
            script.ask_optional_list("Features").unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(script.ask_optional_list("Features").unwrap(), None);
    }

    #[test]
    fn confirm_uses_default_and_rejects_noise() {
        let mut script = Script::new(&["", "maybe", "YES", "n"]);
        assert!(script.confirm("Proceed?", true).unwrap());
        assert!(script.confirm("Proceed?", false).unwrap());
        assert!(!script.confirm("Proceed?", true).unwrap());
        assert_eq!(script.notices, vec!["Please answer y or n.".to_string()]);
    }

    #[test]
    fn end_of_input_cancels() {
        let mut script = Script::new(&[]);
        assert!(matches!(
            script.ask_with_default("Tone", "Friendly"),
            Err(PromptError::Cancelled)
        ));
    }
}
