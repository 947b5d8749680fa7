//! Tokenizer for the shell command language.

use std::fmt::Display;

use crate::ast::{Word, WordPiece};
use crate::error::ParseError;

/// An operator token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operator {
    /// `|`
    Pipe,
    /// `<`
    RedirectInput,
    /// `>`
    RedirectOutput,
    /// `>>`
    RedirectAppend,
    /// `<<`
    HereDoc,
}

impl Operator {
    /// Returns the operator's source text.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pipe => "|",
            Self::RedirectInput => "<",
            Self::RedirectOutput => ">",
            Self::RedirectAppend => ">>",
            Self::HereDoc => "<<",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token produced by the tokenizer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Token {
    /// A (possibly partially quoted) word.
    Word(Word),
    /// An operator.
    Operator(Operator),
}

/// Accumulates the pieces of the word currently being scanned.
#[derive(Default)]
struct WordBuilder {
    pieces: Vec<WordPiece>,
    text: String,
}

impl WordBuilder {
    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.pieces.push(WordPiece::Text(std::mem::take(&mut self.text)));
        }
    }

    fn push_piece(&mut self, piece: WordPiece) {
        self.flush_text();
        self.pieces.push(piece);
    }

    fn take(&mut self) -> Option<Word> {
        self.flush_text();
        if self.pieces.is_empty() {
            None
        } else {
            Some(Word {
                pieces: std::mem::take(&mut self.pieces),
            })
        }
    }
}

/// Tokenizes a single command line into words and operators.
///
/// # Arguments
///
/// * `input` - The command line to tokenize.
pub fn tokenize_str(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = vec![];
    let mut word = WordBuilder::default();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if let Some(w) = word.take() {
                    tokens.push(Token::Word(w));
                }
            }
            '\'' => {
                let mut quoted = String::new();
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(qc) => quoted.push(qc),
                        None => return Err(ParseError::UnterminatedQuote('\'')),
                    }
                }
                word.push_piece(WordPiece::SingleQuoted(quoted));
            }
            '"' => {
                let mut quoted = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            // Backslash inside double quotes only escapes these.
                            Some(ec @ ('$' | '"' | '\\' | '`')) => {
                                // An escaped '$' must not be seen by the expander.
                                word.push_piece(WordPiece::DoubleQuoted(std::mem::take(
                                    &mut quoted,
                                )));
                                word.push_piece(WordPiece::SingleQuoted(ec.to_string()));
                            }
                            Some(ec) => {
                                quoted.push('\\');
                                quoted.push(ec);
                            }
                            None => return Err(ParseError::UnterminatedQuote('"')),
                        },
                        Some(qc) => quoted.push(qc),
                        None => return Err(ParseError::UnterminatedQuote('"')),
                    }
                }
                word.push_piece(WordPiece::DoubleQuoted(quoted));
            }
            '\\' => match chars.next() {
                // Escaping makes the character literal, so treat it as quoted.
                Some(ec) => word.push_piece(WordPiece::SingleQuoted(ec.to_string())),
                None => word.text.push('\\'),
            },
            '|' => {
                if let Some(w) = word.take() {
                    tokens.push(Token::Word(w));
                }
                tokens.push(Token::Operator(Operator::Pipe));
            }
            '<' => {
                if let Some(w) = word.take() {
                    tokens.push(Token::Word(w));
                }
                if chars.peek() == Some(&'<') {
                    chars.next();
                    tokens.push(Token::Operator(Operator::HereDoc));
                } else {
                    tokens.push(Token::Operator(Operator::RedirectInput));
                }
            }
            '>' => {
                if let Some(w) = word.take() {
                    tokens.push(Token::Word(w));
                }
                if chars.peek() == Some(&'>') {
                    chars.next();
                    tokens.push(Token::Operator(Operator::RedirectAppend));
                } else {
                    tokens.push(Token::Operator(Operator::RedirectOutput));
                }
            }
            c => word.text.push(c),
        }
    }

    if let Some(w) = word.take() {
        tokens.push(Token::Word(w));
    }

    tracing::debug!(target: "tokenize", "tokenized {} token(s)", tokens.len());

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use pretty_assertions::assert_eq;

    fn word(pieces: Vec<WordPiece>) -> Token {
        Token::Word(Word { pieces })
    }

    fn text(s: &str) -> Token {
        word(vec![WordPiece::Text(s.to_owned())])
    }

    #[test]
    fn tokenize_empty() -> Result<()> {
        assert_eq!(tokenize_str("")?.len(), 0);
        assert_eq!(tokenize_str("   \t ")?.len(), 0);
        Ok(())
    }

    #[test]
    fn tokenize_simple_words() -> Result<()> {
        let tokens = tokenize_str("echo hello world")?;
        assert_eq!(tokens, vec![text("echo"), text("hello"), text("world")]);
        Ok(())
    }

    #[test]
    fn tokenize_operators() -> Result<()> {
        let tokens = tokenize_str("a>>b")?;
        assert_eq!(
            tokens,
            vec![
                text("a"),
                Token::Operator(Operator::RedirectAppend),
                text("b")
            ]
        );

        let tokens = tokenize_str("cat <<EOF | wc -l > out")?;
        assert_eq!(
            tokens,
            vec![
                text("cat"),
                Token::Operator(Operator::HereDoc),
                text("EOF"),
                Token::Operator(Operator::Pipe),
                text("wc"),
                text("-l"),
                Token::Operator(Operator::RedirectOutput),
                text("out"),
            ]
        );
        Ok(())
    }

    #[test]
    fn tokenize_single_quotes() -> Result<()> {
        let tokens = tokenize_str("echo 'a b'c")?;
        assert_eq!(
            tokens,
            vec![
                text("echo"),
                word(vec![
                    WordPiece::SingleQuoted("a b".to_owned()),
                    WordPiece::Text("c".to_owned())
                ]),
            ]
        );
        Ok(())
    }

    #[test]
    fn tokenize_double_quotes() -> Result<()> {
        let tokens = tokenize_str(r#"echo "a $b""#)?;
        assert_eq!(
            tokens,
            vec![
                text("echo"),
                word(vec![WordPiece::DoubleQuoted("a $b".to_owned())]),
            ]
        );
        Ok(())
    }

    #[test]
    fn tokenize_escaped_dollar_in_double_quotes() -> Result<()> {
        let tokens = tokenize_str(r#"echo "\$HOME""#)?;
        assert_eq!(
            tokens,
            vec![
                text("echo"),
                word(vec![
                    WordPiece::DoubleQuoted(String::new()),
                    WordPiece::SingleQuoted("$".to_owned()),
                    WordPiece::DoubleQuoted("HOME".to_owned()),
                ]),
            ]
        );
        Ok(())
    }

    #[test]
    fn tokenize_backslash_escape() -> Result<()> {
        let tokens = tokenize_str(r"echo a\ b")?;
        assert_eq!(
            tokens,
            vec![
                text("echo"),
                word(vec![
                    WordPiece::Text("a".to_owned()),
                    WordPiece::SingleQuoted(" ".to_owned()),
                    WordPiece::Text("b".to_owned()),
                ]),
            ]
        );
        Ok(())
    }

    #[test]
    fn tokenize_quoted_operator_is_literal() -> Result<()> {
        let tokens = tokenize_str("echo '|'")?;
        assert_eq!(
            tokens,
            vec![text("echo"), word(vec![WordPiece::SingleQuoted("|".to_owned())])]
        );
        Ok(())
    }

    #[test]
    fn tokenize_unterminated_quote() {
        assert!(matches!(
            tokenize_str("echo 'oops"),
            Err(ParseError::UnterminatedQuote('\''))
        ));
        assert!(matches!(
            tokenize_str("echo \"oops"),
            Err(ParseError::UnterminatedQuote('"'))
        ));
    }
}
