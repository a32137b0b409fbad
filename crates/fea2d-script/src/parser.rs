//! Command-script tokenizer.
//!
//! One instruction per line. Fields are separated by spaces, commas or tabs;
//! the first field is the command, the rest (at most [`MAX_FIELDS`]) are its
//! arguments. Blank lines and lines starting with `!` are skipped. Command
//! names are case-insensitive and stored upper case.
//!
//! ```text
//! ! two-node bar
//! N, 0, 0
//! N, 1.2, 0
//! ET 1 sbar
//! ```

use crate::error::ParseError;

/// Maximum number of argument fields after the command
pub const MAX_FIELDS: usize = 10;

const DELIMITERS: &[char] = &[' ', ',', '\t', '\n', '\r'];

/// A tokenized script line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Command name, upper case
    pub command: String,
    /// Raw argument fields
    pub args: Vec<String>,
    /// 1-based line number in the source
    pub line: usize,
}

/// Tokenize every line of `source` lazily, skipping blank and comment lines.
///
/// Items come in source order, so a consumer that stops at the first error
/// has handled exactly the lines before it.
pub fn instructions(source: &str) -> impl Iterator<Item = Result<Instruction, ParseError>> + '_ {
    source
        .lines()
        .enumerate()
        .filter_map(|(index, text)| parse_line(text, index + 1).transpose())
}

fn is_blank(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
}

fn is_comment(text: &str) -> bool {
    text.starts_with('!')
}

/// Tokenize one line; `None` for blank and comment lines
pub fn parse_line(text: &str, line: usize) -> Result<Option<Instruction>, ParseError> {
    if is_blank(text) || is_comment(text) {
        return Ok(None);
    }
    let mut fields = text.split(DELIMITERS).filter(|f| !f.is_empty());
    let command = fields
        .next()
        .ok_or_else(|| ParseError {
            line,
            message: "no command could be parsed".to_string(),
        })?
        .to_uppercase();
    let args: Vec<String> = fields.map(str::to_string).collect();
    if args.len() > MAX_FIELDS {
        return Err(ParseError {
            line,
            message: format!("too many fields ({} > {MAX_FIELDS})", args.len()),
        });
    }
    Ok(Some(Instruction {
        command,
        args,
        line,
    }))
}
