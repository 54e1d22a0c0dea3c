#[cfg(any(test, feature = "test-support"))]
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Terminal used for command output and `y/N` answers.
pub trait Console {
    /// Write `text` followed by a newline to standard output.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if stdout is closed.
    fn println(&mut self, text: &str) -> io::Result<()>;

    /// Block for one line of standard input, without its line terminator.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if stdin cannot be read.
    fn read_line(&mut self) -> io::Result<String>;
}

/// The process's real stdin and stdout.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn println(&mut self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{text}")?;
        out.flush()
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Scripted console for tests: answers come from a queue, output is captured.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct FakeConsole {
    pub input: VecDeque<String>,
    pub output: String,
    pub reads: usize,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeConsole {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A console that answers the next prompt with `answer`.
    #[must_use]
    pub fn answering(answer: &str) -> Self {
        Self {
            input: VecDeque::from([answer.to_string()]),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        self.output.lines().collect()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Console for FakeConsole {
    fn println(&mut self, text: &str) -> io::Result<()> {
        self.output.push_str(text);
        self.output.push('\n');
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<String> {
        self.reads += 1;
        // End of input reads as an empty line, as it does on a real terminal.
        Ok(self.input.pop_front().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_console_captures_output() {
        let mut console = FakeConsole::new();
        console.println("first").unwrap();
        console.println("\nsecond").unwrap();
        assert_eq!(console.output, "first\n\nsecond\n");
        assert_eq!(console.lines(), vec!["first", "", "second"]);
    }

    #[test]
    fn fake_console_replays_answers_then_empty() {
        let mut console = FakeConsole::answering("y");
        assert_eq!(console.read_line().unwrap(), "y");
        assert_eq!(console.read_line().unwrap(), "");
        assert_eq!(console.reads, 2);
    }
}
