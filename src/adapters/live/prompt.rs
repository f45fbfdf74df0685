//! Live decision source that asks on the terminal.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Mutex;

use crate::ports::prompt::{Decision, DecisionSource};

/// Prompts with `Fix <link> -> <target> [Y,a,n,q]?` until a valid answer arrives.
///
/// End of input counts as `quit`, so a closed stdin never loops forever.
pub struct TerminalPrompt {
    input: Mutex<Box<dyn BufRead + Send>>,
    output: Mutex<Box<dyn Write + Send>>,
}

impl TerminalPrompt {
    /// Creates a prompt reading from `input` and writing questions to `output`.
    #[must_use]
    pub fn new(input: Box<dyn BufRead + Send>, output: Box<dyn Write + Send>) -> Self {
        Self { input: Mutex::new(input), output: Mutex::new(output) }
    }

    /// Creates a prompt bound to the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(Box::new(io::BufReader::new(io::stdin())), Box::new(io::stdout()))
    }
}

impl DecisionSource for TerminalPrompt {
    fn decide(&self, symlink: &Path, proposal: &Path) -> Decision {
        let mut input = self.input.lock().expect("prompt input lock poisoned");
        let mut output = self.output.lock().expect("prompt output lock poisoned");
        loop {
            let question =
                format!("Fix {} -> {} [Y,a,n,q]? ", symlink.display(), proposal.display());
            let asked = output.write_all(question.as_bytes()).and_then(|()| output.flush());
            if let Err(err) = asked {
                tracing::warn!("cannot write prompt: {err}");
                return Decision::Quit;
            }

            let mut line = String::new();
            match input.read_line(&mut line) {
                Ok(0) => return Decision::Quit,
                Ok(_) => {
                    if let Some(decision) = Decision::from_answer(&line) {
                        return decision;
                    }
                }
                Err(err) => {
                    tracing::warn!("cannot read answer: {err}");
                    return Decision::Quit;
                }
            }
        }
    }
}
