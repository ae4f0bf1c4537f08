use std::path::PathBuf;

use rustyline::{error::ReadlineError, Editor};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum Error<E> {
    #[error(transparent)]
    Readline(ReadlineError),
    #[error("Eval failed: {0:?}")]
    EvalError(E),
}

#[derive(Clone, Debug)]
pub struct ReplConfig {
    pub prompt: String,
    /// Where to load and persist line history, if anywhere.
    pub history: Option<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: ">> ".to_string(),
            history: None,
        }
    }
}

pub trait Repl {
    type Error: std::fmt::Debug;
    fn evaluate(&mut self, input: String) -> Result<(), Self::Error>;
}

/// Accumulates physical lines into one logical input.
///
/// A line ending in `\` is continued: the backslash becomes a newline and the
/// next line is appended.
#[derive(Default, Debug)]
pub struct LineBuffer {
    pending: Option<String>,
}

impl LineBuffer {
    /// Returns the complete input once a non-continued line arrives.
    pub fn push(&mut self, mut line: String) -> Option<String> {
        if line.ends_with('\\') {
            line.pop();
            line.push('\n');
            match self.pending.as_mut() {
                Some(pending) => pending.push_str(&line),
                None => self.pending = Some(line),
            }
            None
        } else if let Some(mut pending) = self.pending.take() {
            pending.push_str(&line);
            Some(pending)
        } else {
            Some(line)
        }
    }

    pub fn is_continuing(&self) -> bool {
        self.pending.is_some()
    }
}

pub fn start_repl<R: Repl>(config: &ReplConfig, mut repl: R) -> Result<(), Error<R::Error>> {
    let mut editor = Editor::<()>::new();
    if let Some(history) = &config.history {
        match editor.load_history(history) {
            Ok(()) => debug!(path = %history.display(), "loaded history"),
            Err(e) => debug!(path = %history.display(), error = %e, "no history loaded"),
        }
    }
    let mut buffer = LineBuffer::default();
    loop {
        let prompt = if buffer.is_continuing() {
            ".. "
        } else {
            config.prompt.as_str()
        };
        match editor.readline(prompt) {
            Ok(line) => {
                let Some(input) = buffer.push(line) else {
                    continue;
                };
                editor.add_history_entry(input.as_str());
                repl.evaluate(input).map_err(Error::EvalError)?;
                if let Some(history) = &config.history {
                    if let Err(e) = editor.save_history(history) {
                        warn!(path = %history.display(), error = %e, "failed to save history");
                    }
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                println!("Bye!");
                break Ok(());
            }
            Err(e) => break Err(Error::Readline(e)),
        }
    }
}
