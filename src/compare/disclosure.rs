//! Progressive diff disclosure
//!
//! Shows the headers and first changed line of a unified diff, then
//! reveals more on request.

/// Question shown after the first change
pub const DISCLOSURE_PROMPT: &str =
    "Type PRIOR to show all prior output, SUBSEQ for subsequent output, or BOTH for a\nfull diff: ";

/// How much of the diff the operator asked to see
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disclosure {
    /// Everything up to and including the first change
    Prior,
    /// The line before the first change and everything after
    Subsequent,
    Full,
}

impl Disclosure {
    /// Case-insensitive; anything unrecognized shows the whole diff
    pub fn parse(answer: &str) -> Self {
        match answer.trim().to_ascii_uppercase().as_str() {
            "PRIOR" => Disclosure::Prior,
            "SUBSEQ" => Disclosure::Subsequent,
            _ => Disclosure::Full,
        }
    }
}

/// A unified diff with its first change located
#[derive(Debug)]
pub struct ProgressiveDiff<'a> {
    lines: Vec<&'a str>,
    headers: [usize; 2],
    first_change: usize,
}

impl<'a> ProgressiveDiff<'a> {
    /// Locate the two file headers and the first changed line.
    ///
    /// Returns `None` when the diff has fewer than three `+`/`-` lines.
    pub fn locate(unified: &'a str) -> Option<Self> {
        let lines: Vec<&str> = unified.lines().collect();
        let mut marked = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.starts_with('+') || line.starts_with('-'))
            .map(|(idx, _)| idx);

        let from = marked.next()?;
        let to = marked.next()?;
        let first_change = marked.next()?;

        Some(Self {
            lines,
            headers: [from, to],
            first_change,
        })
    }

    /// Headers plus the first changed line
    pub fn preview(&self) -> String {
        [
            self.lines[self.headers[0]],
            self.lines[self.headers[1]],
            self.lines[self.first_change],
        ]
        .join("\n")
    }

    pub fn slice(&self, choice: Disclosure) -> String {
        let shown = match choice {
            Disclosure::Prior => &self.lines[..=self.first_change],
            Disclosure::Subsequent => &self.lines[self.first_change.saturating_sub(1)..],
            Disclosure::Full => &self.lines[..],
        };
        shown.join("\n")
    }
}
