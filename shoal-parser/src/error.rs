//! Error types reported by the tokenizer and parser.

/// Represents an error that occurred while tokenizing or parsing a command line.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    /// A quoted string was started but never terminated.
    #[error("unexpected EOF while looking for matching `{0}'")]
    UnterminatedQuote(char),

    /// An operator appeared somewhere it is not allowed.
    #[error("syntax error near unexpected token `{0}'")]
    UnexpectedToken(String),

    /// A redirection operator was not followed by a target word.
    #[error("syntax error: redirection missing target")]
    MissingRedirectTarget,

    /// The command line ended where another command was expected.
    #[error("syntax error: unexpected end of input")]
    UnexpectedEndOfInput,
}
