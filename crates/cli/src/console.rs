//! Line-oriented terminal I/O and the interactive label prompt

use std::io::{BufRead, Write};
use stylo_core::{Error, LabelPrompt};

/// Word that ends an interactive loop (case-insensitive)
pub const EXIT_WORD: &str = "exit";

pub struct Console<R, W> {
  input: R,
  output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
  pub fn new(input: R, output: W) -> Self {
    Self { input, output }
  }

  /// Print `question` and read one line; None on end of input
  pub fn ask(&mut self, question: &str) -> std::io::Result<Option<String>> {
    write!(self.output, "{}", question)?;
    self.output.flush()?;

    let mut line = String::new();
    if self.input.read_line(&mut line)? == 0 {
      return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
  }

  /// Ask for a text; None when the user types the exit word or input ends
  pub fn next_text(&mut self, question: &str) -> std::io::Result<Option<String>> {
    Ok(self.ask(question)?.filter(|text| !is_exit(text)))
  }

  pub fn say(&mut self, message: impl std::fmt::Display) -> std::io::Result<()> {
    writeln!(self.output, "{}", message)
  }

  /// Ask until a non-blank answer arrives; None on end of input
  pub fn ask_non_blank(&mut self, question: &str) -> std::io::Result<Option<String>> {
    loop {
      match self.ask(question)? {
        None => return Ok(None),
        Some(answer) if answer.trim().is_empty() => continue,
        Some(answer) => return Ok(Some(answer.trim().to_string())),
      }
    }
  }

  #[cfg(test)]
  pub fn output(&self) -> &W {
    &self.output
  }
}

pub fn is_exit(text: &str) -> bool {
  text.trim().eq_ignore_ascii_case(EXIT_WORD)
}

/// Asks the person at the terminal who wrote a text
pub struct ConsolePrompt<'a, R, W> {
  console: &'a mut Console<R, W>,
}

impl<'a, R: BufRead, W: Write> ConsolePrompt<'a, R, W> {
  pub fn new(console: &'a mut Console<R, W>) -> Self {
    Self { console }
  }
}

impl<R: BufRead, W: Write> LabelPrompt for ConsolePrompt<'_, R, W> {
  fn request_label(&mut self, _text: &str) -> stylo_core::Result<String> {
    self
      .console
      .ask_non_blank("Who wrote this? Enter the author's name: ")?
      .ok_or(Error::LabelRequired)
  }
}
