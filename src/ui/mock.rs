use crate::error::{Result, RolloutError};
use crate::ui::{formatter, MessageLevel, Reporter};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Reporter for tests: records output and answers prompts from a script
///
/// Confirmations accept by default. Inputs are served from a queue; an
/// exhausted queue yields an I/O error, like a closed stdin.
pub struct MockReporter {
    confirmation_fn: Option<Box<dyn Fn() -> Result<bool> + Send + Sync>>,
    inputs: Mutex<VecDeque<String>>,
    lines: Mutex<Vec<String>>,
    tables: Mutex<Vec<Vec<String>>>,
    confirmation_calls: Mutex<usize>,
    input_calls: Mutex<usize>,
}

impl MockReporter {
    pub fn new() -> Self {
        MockReporter {
            confirmation_fn: None,
            inputs: Mutex::new(VecDeque::new()),
            lines: Mutex::new(Vec::new()),
            tables: Mutex::new(Vec::new()),
            confirmation_calls: Mutex::new(0),
            input_calls: Mutex::new(0),
        }
    }

    /// Answer every confirmation with `answer`
    pub fn confirming(answer: bool) -> Self {
        Self::new().on_confirmation(move || Ok(answer))
    }

    pub fn on_confirmation(mut self, f: impl Fn() -> Result<bool> + Send + Sync + 'static) -> Self {
        self.confirmation_fn = Some(Box::new(f));
        self
    }

    /// Queue lines returned by successive `input` calls
    pub fn with_inputs<I, S>(self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs
            .lock()
            .unwrap()
            .extend(inputs.into_iter().map(Into::into));
        self
    }

    pub fn confirmation_calls(&self) -> usize {
        *self.confirmation_calls.lock().unwrap()
    }

    pub fn input_calls(&self) -> usize {
        *self.input_calls.lock().unwrap()
    }

    /// Every printed line, tables included, in print order
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Each printed table as rendered plain lines
    pub fn tables(&self) -> Vec<Vec<String>> {
        self.tables.lock().unwrap().clone()
    }

    /// True when some printed line contains `needle`
    pub fn printed(&self, needle: &str) -> bool {
        self.lines.lock().unwrap().iter().any(|l| l.contains(needle))
    }
}

impl Default for MockReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for MockReporter {
    fn print_line(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }

    fn print_colorized_line(&self, title: &str, content: &str, _level: MessageLevel) {
        self.lines
            .lock()
            .unwrap()
            .push(format!("{}{}", title, content));
    }

    fn print_table(&self, headers: &[&str], rows: &[Vec<String>]) {
        let rendered = formatter::render_table(headers, rows);
        self.lines.lock().unwrap().extend(rendered.iter().cloned());
        self.tables.lock().unwrap().push(rendered);
    }

    fn confirmation(
        &self,
        _action_text: &str,
        _cancellation_message: &str,
        _success_message: &str,
    ) -> Result<bool> {
        *self.confirmation_calls.lock().unwrap() += 1;
        match &self.confirmation_fn {
            Some(f) => f(),
            None => Ok(true),
        }
    }

    fn input(&self) -> Result<String> {
        *self.input_calls.lock().unwrap() += 1;
        self.inputs.lock().unwrap().pop_front().ok_or_else(|| {
            RolloutError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "no more scripted input",
            ))
        })
    }
}
