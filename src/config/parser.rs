use anyhow::{bail, Result};
use logos::Span;

use super::token::{Tokens, Variant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Bool(bool),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s:?}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// One `key = value` statement and where its key was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: Value,
    pub span: Span,
}

fn try_value_from(tokens: &mut Tokens<'_>) -> Result<Value> {
    match *tokens.tokens() {
        [Variant::String(s), ..] => {
            let s = s.to_string();
            tokens.step();
            Ok(Value::String(s))
        }
        [Variant::Bool(b), ..] => {
            tokens.step();
            Ok(Value::Bool(b))
        }
        [token, ..] => bail!(tokens.error_current_span(format!(
            "Found unexpected token {token:?} while trying to parse value"
        ))),
        [] => bail!(tokens.error_current_span("Expected a value, found nothing")),
    }
}

/// Parses a sequence of `key = value` statements, optionally separated by
/// `,` or `;`.
pub fn parse_config(tokens: &mut Tokens<'_>) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();

    while !tokens.is_empty() {
        match *tokens.tokens() {
            [Variant::Ident(ident), Variant::Eq, ..] => {
                let span = tokens.try_span().expect("Just matched it");
                let value = try_value_from(tokens.skiping(2))?;

                crate::trace!("Config entry {ident} = {value}");

                entries.push(Entry {
                    key: ident.to_string(),
                    value,
                    span,
                });

                if let [Variant::Comma | Variant::Semicolon, ..] = tokens.tokens() {
                    tokens.step();
                }
            }
            [Variant::Ident(ident), ..] => {
                bail!(tokens.error_current_span(format!("Expected '=' after `{ident}`")))
            }
            [token, ..] => {
                bail!(tokens.error_current_span(format!("Found unexpected token {token:?}")))
            }
            [] => break,
        }
    }

    Ok(entries)
}
