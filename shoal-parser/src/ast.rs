//! Types composing the abstract syntax tree of a parsed command line.

use std::fmt::{self, Display, Write as _};

/// A complete pipeline: one or more simple commands whose standard streams
/// are chained left to right.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pipeline {
    /// The stages of the pipeline, in left-to-right order.
    pub stages: Vec<SimpleCommand>,
}

impl Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{stage}")?;
        }
        Ok(())
    }
}

/// A single pipeline stage: an argument vector plus an ordered list of
/// redirections. A stage may be redirection-only (no words).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SimpleCommand {
    /// The words of the command; the first word (after expansion) is the
    /// command name.
    pub words: Vec<Word>,
    /// Redirections attached to this stage, in textual order. Later entries
    /// targeting the same stream override earlier ones.
    pub redirects: Vec<Redirect>,
}

impl Display for SimpleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for word in &self.words {
            if !first {
                f.write_char(' ')?;
            }
            write!(f, "{word}")?;
            first = false;
        }
        for redirect in &self.redirects {
            if !first {
                f.write_char(' ')?;
            }
            write!(f, "{redirect}")?;
            first = false;
        }
        Ok(())
    }
}

/// A word: a sequence of pieces with differing quoting, adjacent in the
/// source text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Word {
    /// The pieces of the word, in order.
    pub pieces: Vec<WordPiece>,
}

impl Word {
    /// Returns the literal text of the word with quoting removed and no
    /// expansion performed.
    pub fn flatten(&self) -> String {
        let mut s = String::new();
        for piece in &self.pieces {
            match piece {
                WordPiece::Text(t) | WordPiece::SingleQuoted(t) | WordPiece::DoubleQuoted(t) => {
                    s.push_str(t);
                }
            }
        }
        s
    }

    /// Returns whether any part of the word was quoted in the source text.
    pub fn is_quoted(&self) -> bool {
        self.pieces
            .iter()
            .any(|p| !matches!(p, WordPiece::Text(_)))
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in &self.pieces {
            match piece {
                WordPiece::Text(t) => f.write_str(t)?,
                WordPiece::SingleQuoted(t) => write!(f, "'{t}'")?,
                WordPiece::DoubleQuoted(t) => write!(f, "\"{t}\"")?,
            }
        }
        Ok(())
    }
}

/// One piece of a word.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WordPiece {
    /// Unquoted text; subject to expansion.
    Text(String),
    /// Single-quoted text; fully literal.
    SingleQuoted(String),
    /// Double-quoted text; parameters remain active inside.
    DoubleQuoted(String),
}

/// A redirection attached to a simple command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Redirect {
    /// The kind of redirection.
    pub kind: RedirectKind,
    /// The file descriptor being redirected.
    pub fd: u32,
    /// The target of the redirection.
    pub target: RedirectTarget,
}

impl Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.kind {
            RedirectKind::Input => "<",
            RedirectKind::Output => ">",
            RedirectKind::Append => ">>",
            RedirectKind::HereDoc => "<<",
        };
        write!(f, "{op}{}", self.target)
    }
}

/// The kind of a redirection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RedirectKind {
    /// Redirect input from a file (`<`).
    Input,
    /// Redirect output to a file, truncating it (`>`).
    Output,
    /// Redirect output to a file, appending to it (`>>`).
    Append,
    /// Redirect input from an inline here-document (`<<`).
    HereDoc,
}

impl RedirectKind {
    /// Returns the file descriptor this kind of redirection targets when
    /// none is specified.
    pub const fn default_fd(self) -> u32 {
        match self {
            Self::Input | Self::HereDoc => 0,
            Self::Output | Self::Append => 1,
        }
    }
}

/// The target of a redirection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RedirectTarget {
    /// A file path word, still subject to expansion.
    Filename(Word),
    /// A here-document tag.
    HereDocTag(HereDocTag),
}

impl Display for RedirectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filename(word) => write!(f, "{word}"),
            Self::HereDocTag(tag) => f.write_str(tag.delimiter.as_str()),
        }
    }
}

/// Identifies a here-document: its terminating delimiter and whether the
/// collected body lines undergo expansion.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HereDocTag {
    /// The delimiter line, with quoting removed.
    pub delimiter: String,
    /// Whether body lines undergo parameter expansion; quoting any part of
    /// the delimiter disables it.
    pub requires_expansion: bool,
}
