//! Result rendering: one line per item, or a single JSON document.

use std::fmt::Display;
use std::io::{self, Write};

use common::Result;
use serde::Serialize;

pub struct Output<W: Write = io::Stdout> {
    json: bool,
    writer: W,
}

impl Output {
    pub fn stdout(json: bool) -> Self {
        Self::new(json, io::stdout())
    }
}

impl<W: Write> Output<W> {
    pub fn new(json: bool, writer: W) -> Self {
        Self { json, writer }
    }

    /// Writes a result set, preserving the order it was returned in.
    pub fn list<T: Serialize + Display>(&mut self, items: &[T]) -> Result<()> {
        if self.json {
            serde_json::to_writer(&mut self.writer, items)?;
            writeln!(self.writer)?;
        } else {
            for item in items {
                writeln!(self.writer, "{item}")?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn line(&mut self, value: impl Display) -> Result<()> {
        writeln!(self.writer, "{value}")?;
        self.writer.flush()?;
        Ok(())
    }

    #[cfg(test)]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }
}
