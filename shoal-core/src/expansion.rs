//! Word expansion.

use shoal_parser::ast;

use crate::shell::Shell;

/// Expands a word into at most one field for argv construction. Returns
/// `None` when an entirely unquoted word expands to an empty string, in
/// which case the word produces no field at all.
pub(crate) fn expand_word(shell: &Shell, word: &ast::Word) -> Option<String> {
    let mut result = String::new();
    let mut quoted = false;

    for (i, piece) in word.pieces.iter().enumerate() {
        match piece {
            ast::WordPiece::Text(text) => {
                let text = if i == 0 {
                    expand_tilde_prefix(shell, text)
                } else {
                    text.clone()
                };
                result.push_str(&expand_text(shell, &text));
            }
            ast::WordPiece::SingleQuoted(text) => {
                quoted = true;
                result.push_str(text);
            }
            ast::WordPiece::DoubleQuoted(text) => {
                quoted = true;
                result.push_str(&expand_text(shell, text));
            }
        }
    }

    if result.is_empty() && !quoted {
        None
    } else {
        Some(result)
    }
}

/// Expands parameter references (`$NAME`, `${NAME}`, `$?`, `$0`..`$9`) in the
/// given text. Used for unquoted and double-quoted word text as well as
/// here-document bodies.
pub(crate) fn expand_text(shell: &Shell, text: &str) -> String {
    let mut result = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        match chars.peek() {
            Some('?') => {
                chars.next();
                result.push_str(&shell.last_exit_status.to_string());
            }
            Some(d) if d.is_ascii_digit() => {
                let d = *d;
                chars.next();
                if let Some(value) = shell.positional_parameter(d) {
                    result.push_str(value);
                }
            }
            Some('{') => {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }

                if closed {
                    if let Some(value) = shell.env.get_str(&name) {
                        result.push_str(value);
                    }
                } else {
                    // No closing brace; the text stays literal.
                    result.push_str("${");
                    result.push_str(&name);
                }
            }
            Some(c) if c.is_ascii_alphabetic() || *c == '_' => {
                let mut name = String::new();
                while let Some(c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || *c == '_' {
                        name.push(*c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if let Some(value) = shell.env.get_str(&name) {
                    result.push_str(value);
                }
            }
            // A bare `$` (or one followed by an inert character) is literal.
            _ => result.push('$'),
        }
    }

    result
}

/// Replaces a leading `~` (alone or followed by `/`) with the value of
/// `HOME`, when set.
fn expand_tilde_prefix(shell: &Shell, text: &str) -> String {
    if let Some(rest) = text.strip_prefix('~') {
        if rest.is_empty() || rest.starts_with('/') {
            if let Some(home) = shell.env.get_str("HOME") {
                return format!("{home}{rest}");
            }
        }
    }

    text.to_owned()
}
