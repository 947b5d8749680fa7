//! Parser assembling tokens into a pipeline.

use crate::ast;
use crate::error::ParseError;
use crate::tokenizer::{Operator, Token, tokenize_str};

/// Parses a single command line into a pipeline. Returns `Ok(None)` for a
/// blank line.
///
/// # Arguments
///
/// * `input` - The command line to parse.
pub fn parse_line(input: &str) -> Result<Option<ast::Pipeline>, ParseError> {
    let tokens = tokenize_str(input)?;
    if tokens.is_empty() {
        return Ok(None);
    }

    let pipeline = parse_tokens(tokens)?;

    tracing::debug!(target: "parse", "parsed: {pipeline}");

    Ok(Some(pipeline))
}

fn parse_tokens(tokens: Vec<Token>) -> Result<ast::Pipeline, ParseError> {
    let mut stages = vec![];
    let mut current = new_stage();
    let mut tokens = tokens.into_iter();

    while let Some(token) = tokens.next() {
        match token {
            Token::Word(word) => current.words.push(word),
            Token::Operator(Operator::Pipe) => {
                if stage_is_empty(&current) {
                    return Err(ParseError::UnexpectedToken(
                        Operator::Pipe.as_str().to_owned(),
                    ));
                }
                stages.push(std::mem::replace(&mut current, new_stage()));
            }
            Token::Operator(op) => {
                let kind = match op {
                    Operator::RedirectInput => ast::RedirectKind::Input,
                    Operator::RedirectOutput => ast::RedirectKind::Output,
                    Operator::RedirectAppend => ast::RedirectKind::Append,
                    Operator::HereDoc => ast::RedirectKind::HereDoc,
                    // Handled in the preceding arm.
                    Operator::Pipe => continue,
                };
                let target = match tokens.next() {
                    Some(Token::Word(word)) => word,
                    Some(Token::Operator(next_op)) => {
                        return Err(ParseError::UnexpectedToken(next_op.as_str().to_owned()));
                    }
                    None => return Err(ParseError::MissingRedirectTarget),
                };

                let target = match kind {
                    ast::RedirectKind::HereDoc => {
                        ast::RedirectTarget::HereDocTag(ast::HereDocTag {
                            requires_expansion: !target.is_quoted(),
                            delimiter: target.flatten(),
                        })
                    }
                    _ => ast::RedirectTarget::Filename(target),
                };

                current.redirects.push(ast::Redirect {
                    kind,
                    fd: kind.default_fd(),
                    target,
                });
            }
        }
    }

    // A trailing pipe leaves an empty final stage behind.
    if !stages.is_empty() && stage_is_empty(&current) {
        return Err(ParseError::UnexpectedEndOfInput);
    }

    stages.push(current);

    Ok(ast::Pipeline { stages })
}

fn new_stage() -> ast::SimpleCommand {
    ast::SimpleCommand {
        words: vec![],
        redirects: vec![],
    }
}

fn stage_is_empty(stage: &ast::SimpleCommand) -> bool {
    stage.words.is_empty() && stage.redirects.is_empty()
}
