//! Report sink for test transcripts
//!
//! A `Console` is where a test writes its start message, status line and
//! diff. It either streams to the terminal or collects into a private
//! buffer so parallel workers can hand their transcript over whole.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use super::formatter::{Render, Tone};

enum Sink {
    Terminal(io::Stdout),
    Buffer(Vec<u8>),
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Terminal(out) => out.write(buf),
            Sink::Buffer(buffer) => buffer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Terminal(out) => out.flush(),
            Sink::Buffer(_) => Ok(()),
        }
    }
}

/// Output sink plus optional operator input for interactive prompts
pub struct Console {
    sink: Sink,
    operator: Option<Box<dyn BufRead + Send>>,
    progressive: bool,
    render: Arc<dyn Render>,
}

impl Console {
    /// Write straight to standard output
    pub fn terminal(render: Arc<dyn Render>) -> Self {
        Self {
            sink: Sink::Terminal(io::stdout()),
            operator: None,
            progressive: false,
            render,
        }
    }

    /// Collect everything written into memory
    pub fn buffered(render: Arc<dyn Render>) -> Self {
        Self {
            sink: Sink::Buffer(Vec::new()),
            operator: None,
            progressive: false,
            render,
        }
    }

    /// Source for answers to interactive prompts
    pub fn with_operator(mut self, input: impl BufRead + Send + 'static) -> Self {
        self.operator = Some(Box::new(input));
        self
    }

    /// Request progressive diff disclosure
    pub fn progressive(mut self, enabled: bool) -> Self {
        self.progressive = enabled;
        self
    }

    /// Progressive disclosure needs someone to answer the prompt
    pub fn is_progressive(&self) -> bool {
        self.progressive && self.operator.is_some()
    }

    pub fn renderer(&self) -> Arc<dyn Render> {
        Arc::clone(&self.render)
    }

    pub fn render(&self, text: &str, tone: Tone) -> String {
        self.render.render(text, tone)
    }

    /// Write text as-is and flush
    pub fn write(&mut self, text: &str) -> io::Result<()> {
        self.sink.write_all(text.as_bytes())?;
        self.sink.flush()
    }

    /// Write text followed by a newline
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        self.write(text)?;
        self.write("\n")
    }

    /// Write a rendered status line
    pub fn status(&mut self, text: &str, tone: Tone) -> io::Result<()> {
        let rendered = self.render(text, tone);
        self.line(&rendered)
    }

    /// Show a prompt and read one answer; empty without an operator or at EOF
    pub fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.write(prompt)?;
        let mut answer = String::new();
        if let Some(operator) = self.operator.as_mut() {
            operator.read_line(&mut answer)?;
        }
        Ok(answer.trim().to_string())
    }

    /// Buffered text so far; empty for terminal consoles
    pub fn transcript(&self) -> String {
        match &self.sink {
            Sink::Terminal(_) => String::new(),
            Sink::Buffer(buffer) => String::from_utf8_lossy(buffer).into_owned(),
        }
    }

    pub fn into_transcript(self) -> String {
        match self.sink {
            Sink::Terminal(_) => String::new(),
            Sink::Buffer(buffer) => String::from_utf8_lossy(&buffer).into_owned(),
        }
    }
}
