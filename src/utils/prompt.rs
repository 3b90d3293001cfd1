use crate::error::{Error, Result};
use colored::*;
use std::io::{self, BufRead, Cursor, Sink, StdinLock, Stdout, Write};

/// Everything the classifier needs from an operator.
pub trait Prompt {
    /// Free text; an empty answer yields `default`.
    fn ask_text(&mut self, message: &str, default: &str) -> Result<String>;

    /// Repeats until the answer starts with `y` or `n`.
    fn ask_yes_no(&mut self, message: &str) -> Result<bool>;

    /// Repeats until the answer is an integer within `min..=max`.
    fn ask_number(&mut self, message: &str, min: i64, max: i64) -> Result<i64>;
}

/// Line-oriented prompt over any reader/writer pair.
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl LinePrompt<StdinLock<'static>, Stdout> {
    pub fn console() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl LinePrompt<Cursor<Vec<u8>>, Sink> {
    /// Replays `answers` one line at a time and discards all output.
    pub fn scripted<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut script = String::new();
        for answer in answers {
            script.push_str(answer.as_ref());
            script.push('\n');
        }
        Self::new(Cursor::new(script.into_bytes()), io::sink())
    }

    pub fn is_exhausted(&self) -> bool {
        self.input.position() as usize >= self.input.get_ref().len()
    }
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{} ", message.bold())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    fn complain(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message.yellow())?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn ask_text(&mut self, message: &str, default: &str) -> Result<String> {
        let answer = self.ask(message)?;
        Ok(if answer.is_empty() {
            default.to_string()
        } else {
            answer
        })
    }

    fn ask_yes_no(&mut self, message: &str) -> Result<bool> {
        loop {
            let answer = self.ask(message)?;
            match parse_yes_no(&answer) {
                Some(value) => return Ok(value),
                None => self.complain("Please respond with a 'y' or 'n'")?,
            }
        }
    }

    fn ask_number(&mut self, message: &str, min: i64, max: i64) -> Result<i64> {
        loop {
            let answer = self.ask(message)?;
            match parse_number(&answer, min, max) {
                Some(value) => return Ok(value),
                None => {
                    self.complain(&format!("Please enter a number from {} to {}", min, max))?
                }
            }
        }
    }
}

fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('y') => Some(true),
        Some('n') => Some(false),
        _ => None,
    }
}

fn parse_number(answer: &str, min: i64, max: i64) -> Option<i64> {
    answer
        .parse::<i64>()
        .ok()
        .filter(|value| (min..=max).contains(value))
}
