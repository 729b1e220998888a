//! User interface module - the [Reporter] capability and its terminal implementation.
//!
//! Separates concerns:
//! - `formatter` - Pure layout functions
//! - `mock` - Recording reporter for tests
//! - This module - The trait and the interactive terminal implementation

use console::{style, Style, Term};

use crate::error::Result;

pub mod formatter;
pub mod mock;

pub use mock::MockReporter;

/// Severity of a colorized line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
    Success,
    Plain,
}

/// Everything the workflows print or ask the operator
pub trait Reporter {
    fn print_line(&self, line: &str);

    /// Print `title` followed by `content` colored by `level`
    fn print_colorized_line(&self, title: &str, content: &str, level: MessageLevel);

    fn print_table(&self, headers: &[&str], rows: &[Vec<String>]);

    /// Ask a yes/no question; anything but an explicit yes declines.
    ///
    /// `cancellation_message` is printed on decline and `success_message` on
    /// accept; empty messages are skipped.
    fn confirmation(
        &self,
        action_text: &str,
        cancellation_message: &str,
        success_message: &str,
    ) -> Result<bool>;

    /// Read one line of operator input, without the line terminator
    fn input(&self) -> Result<String>;
}

/// [Reporter] writing to the terminal with `console` styling
#[derive(Debug, Clone)]
pub struct TerminalReporter {
    term: Term,
}

impl TerminalReporter {
    pub fn new() -> Self {
        TerminalReporter {
            term: Term::stdout(),
        }
    }

    fn level_style(level: MessageLevel) -> Style {
        match level {
            MessageLevel::Info => Style::new().cyan(),
            MessageLevel::Warning => Style::new().yellow(),
            MessageLevel::Error => Style::new().red(),
            MessageLevel::Success => Style::new().green(),
            MessageLevel::Plain => Style::new().white(),
        }
    }

    fn write(&self, line: &str) {
        if self.term.write_line(line).is_err() {
            println!("{}", line);
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for TerminalReporter {
    fn print_line(&self, line: &str) {
        self.write(line);
    }

    fn print_colorized_line(&self, title: &str, content: &str, level: MessageLevel) {
        let line = format!(
            "{}{}",
            style(title).cyan(),
            Self::level_style(level).apply_to(content)
        );
        self.write(&line);
    }

    fn print_table(&self, headers: &[&str], rows: &[Vec<String>]) {
        let widths = formatter::column_widths(headers, rows);

        let header: Vec<String> = headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| style(formatter::pad(h, *w)).green().underlined().to_string())
            .collect();
        self.write(&header.join("  "));

        for row in rows {
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let padded = formatter::pad(cell, widths[i]);
                    if i == 0 {
                        style(padded).yellow().to_string()
                    } else {
                        padded
                    }
                })
                .collect();
            self.write(cells.join("  ").trim_end());
        }
    }

    fn confirmation(
        &self,
        action_text: &str,
        cancellation_message: &str,
        success_message: &str,
    ) -> Result<bool> {
        self.term.write_str(&format!(
            "{}",
            style(format!("{}? {}", action_text, formatter::CONFIRMATION_TEXT)).yellow()
        ))?;

        let answer = self.input()?;
        if !formatter::is_affirmative(&answer) {
            if !cancellation_message.is_empty() {
                self.term
                    .write_line(&style(cancellation_message).red().to_string())?;
            }
            return Ok(false);
        }

        if !success_message.is_empty() {
            self.term
                .write_line(&style(success_message).green().to_string())?;
        }
        Ok(true)
    }

    fn input(&self) -> Result<String> {
        Ok(self.term.read_line()?)
    }
}
