//! Implements a tokenizer and parser for a POSIX-style shell command language:
//! simple commands, pipelines, and file/heredoc redirections.

pub mod ast;

mod error;
mod parser;
mod tokenizer;

pub use error::ParseError;
pub use parser::parse_line;
pub use tokenizer::{Operator, Token, tokenize_str};
