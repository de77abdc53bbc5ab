//! Stdin replay buffer
//!
//! Serves pre-queued lines to a captured callable, one per read.

use thiserror::Error;

/// Raised when a callable reads more lines than the test supplied
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot read element {position}. Has it been written?")]
pub struct BufferExhausted {
    /// Index of the line that was requested
    pub position: usize,
}

/// Line-oriented stdin stand-in with a rewindable read cursor
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StdinReplay {
    lines: Vec<String>,
    position: usize,
}

impl StdinReplay {
    /// Create a buffer pre-loaded with lines
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            position: 0,
        }
    }

    /// Queue another line after the existing ones
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Return the next queued line
    pub fn read_line(&mut self) -> Result<String, BufferExhausted> {
        let line = self
            .lines
            .get(self.position)
            .cloned()
            .ok_or(BufferExhausted {
                position: self.position,
            })?;
        self.position += 1;
        Ok(line)
    }

    /// Move the read cursor back to the first line
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Drop every queued line and reset the cursor
    pub fn clear(&mut self) {
        self.lines.clear();
        self.position = 0;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines not yet read
    pub fn remaining(&self) -> usize {
        self.lines.len().saturating_sub(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_in_order_then_exhausts() {
        let mut buffer = StdinReplay::new(["a\n", "b\n"]);
        assert_eq!(buffer.read_line().unwrap(), "a\n");
        assert_eq!(buffer.read_line().unwrap(), "b\n");
        assert_eq!(buffer.read_line(), Err(BufferExhausted { position: 2 }));

        buffer.rewind();
        assert_eq!(buffer.read_line().unwrap(), "a\n");
    }

    #[test]
    fn test_push_and_clear() {
        let mut buffer = StdinReplay::default();
        assert!(buffer.read_line().is_err());

        buffer.push("x\n");
        buffer.push("y\n");
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.read_line().unwrap(), "x\n");
        assert_eq!(buffer.remaining(), 1);

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.position(), 0);
        assert!(buffer.read_line().is_err());
    }

    #[test]
    fn test_exhausted_message() {
        let err = BufferExhausted { position: 3 };
        assert_eq!(err.to_string(), "Cannot read element 3. Has it been written?");
    }
}
