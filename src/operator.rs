//! The person at the bench: answers prompts and reads reports

use std::io::{self, BufRead, Write};

use crate::Result;

pub trait Operator {
    /// Show `message` and wait for one line of input, without its line ending
    fn prompt(&mut self, message: &str) -> Result<String>;
    fn report(&mut self, message: &str) -> Result<()>;
}

/// Line-oriented operator over any reader/writer pair
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Operator for Console<R, W> {
    fn prompt(&mut self, message: &str) -> Result<String> {
        self.report(message)?;
        let mut line = String::new();
        // EOF reads as an empty answer
        self.input.read_line(&mut line)?;
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_owned())
    }

    fn report(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message)?;
        self.output.flush()?;
        Ok(())
    }
}
