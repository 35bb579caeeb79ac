//! Loader script handling
//!
//! A configuration is often shipped as a script that calls the loader's
//! entry point with an object literal:
//!
//! ```text
//! System.config({
//!   defaultJSExtensions: true,
//!   map: { "jquery": "github:components/jquery@2.1.4" }
//! });
//! ```
//!
//! This module pulls the object literals out of such scripts so the loader
//! can parse them as YAML flow mappings, and renders a table back into the
//! same form.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use loadmap_core::config::LoaderConfig;

use crate::error::ConfigError;

/// Matches the start of a configuration call.
static CONFIG_CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:SystemJS|System)\.config\s*\(").expect("valid regex"));

/// Lexer state shared by the scanners below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    Str(char),
    Escape(char),
    LineComment,
    BlockComment,
}

/// Returns `true` if `text` contains a configuration call.
#[must_use]
pub fn is_script(text: &str) -> bool {
    CONFIG_CALL_RE.is_match(text)
}

/// Removes `//` and `/* */` comments that sit outside string literals.
///
/// Newlines inside comments are kept so parser line numbers still line up
/// with the source.
#[must_use]
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut state = State::Code;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '"' | '\'' | '`' => {
                    state = State::Str(c);
                    out.push(c);
                }
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = State::BlockComment;
                    out.push(' ');
                }
                _ => out.push(c),
            },
            State::Str(quote) => {
                out.push(c);
                if c == '\\' {
                    state = State::Escape(quote);
                } else if c == quote {
                    state = State::Code;
                }
            }
            State::Escape(quote) => {
                out.push(c);
                state = State::Str(quote);
            }
            State::LineComment => {
                if c == '\n' {
                    out.push('\n');
                    state = State::Code;
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                } else if c == '\n' {
                    out.push('\n');
                }
            }
        }
    }

    out
}

/// Removes commas that directly precede a closing `}` or `]`.
#[must_use]
pub fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut state = State::Code;

    for (idx, c) in text.char_indices() {
        match state {
            State::Code => {
                if c == ',' {
                    let rest = text[idx + 1..].trim_start();
                    if rest.starts_with('}') || rest.starts_with(']') {
                        continue;
                    }
                } else if matches!(c, '"' | '\'' | '`') {
                    state = State::Str(c);
                }
                out.push(c);
            }
            State::Str(quote) => {
                out.push(c);
                if c == '\\' {
                    state = State::Escape(quote);
                } else if c == quote {
                    state = State::Code;
                }
            }
            State::Escape(quote) => {
                out.push(c);
                state = State::Str(quote);
            }
            State::LineComment | State::BlockComment => out.push(c),
        }
    }

    out
}

/// Inserts a space after every `:` outside string literals that is not
/// already followed by whitespace.
///
/// Minified scripts write `{a:true}`; a YAML flow mapping needs `{a: true}`.
#[must_use]
pub fn space_after_colons(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut state = State::Code;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        out.push(c);
        match state {
            State::Code => match c {
                '"' | '\'' | '`' => state = State::Str(c),
                ':' if chars.peek().is_some_and(|next| !next.is_whitespace()) => out.push(' '),
                _ => {}
            },
            State::Str(quote) => {
                if c == '\\' {
                    state = State::Escape(quote);
                } else if c == quote {
                    state = State::Code;
                }
            }
            State::Escape(quote) => state = State::Str(quote),
            State::LineComment | State::BlockComment => {}
        }
    }

    out
}

/// Turns the argument of a configuration call into a YAML flow document.
#[must_use]
pub fn normalize_call(call: &str) -> String {
    space_after_colons(&strip_trailing_commas(call))
}

/// Extracts the argument text of every configuration call in `code`.
///
/// `code` must already be free of comments. Calls are returned in source
/// order; the loader applies them one after another. A call name that
/// appears inside a string literal is not a call.
///
/// # Errors
///
/// Returns [`ConfigError::ParseError`] if a call is never closed.
pub fn extract_config_calls<'a>(code: &'a str, path: &Path) -> Result<Vec<&'a str>, ConfigError> {
    let mut calls = Vec::new();
    let mut resume_at = 0;
    let strings = string_spans(code);

    for found in CONFIG_CALL_RE.find_iter(code) {
        if found.start() < resume_at {
            continue;
        }
        if strings
            .iter()
            .any(|&(open, close)| open <= found.start() && found.start() < close)
        {
            continue;
        }
        let start = found.end();
        let Some(len) = argument_len(&code[start..]) else {
            return Err(ConfigError::ParseError {
                path: path.to_path_buf(),
                line: Some(line_of(code, found.start())),
                message: "Unclosed configuration call".to_string(),
            });
        };
        calls.push(code[start..start + len].trim());
        resume_at = start + len;
    }

    Ok(calls)
}

/// Renders a table as a loader script.
///
/// # Errors
///
/// Returns a serialization error if the table cannot be encoded.
pub fn render(config: &LoaderConfig) -> Result<String, serde_json::Error> {
    let body = serde_json::to_string_pretty(config)?;
    Ok(format!("System.config({body});\n"))
}

/// Byte length of a call argument up to (not including) its closing paren.
fn argument_len(text: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut state = State::Code;

    for (idx, c) in text.char_indices() {
        match state {
            State::Code => match c {
                '"' | '\'' | '`' => state = State::Str(c),
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(idx);
                    }
                }
                _ => {}
            },
            State::Str(quote) => {
                if c == '\\' {
                    state = State::Escape(quote);
                } else if c == quote {
                    state = State::Code;
                }
            }
            State::Escape(quote) => state = State::Str(quote),
            State::LineComment | State::BlockComment => {}
        }
    }

    None
}

/// Byte ranges of the string literals in `code`, quotes included.
fn string_spans(code: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut state = State::Code;
    let mut open = 0;

    for (idx, c) in code.char_indices() {
        match state {
            State::Code => {
                if matches!(c, '"' | '\'' | '`') {
                    state = State::Str(c);
                    open = idx;
                }
            }
            State::Str(quote) => {
                if c == '\\' {
                    state = State::Escape(quote);
                } else if c == quote {
                    spans.push((open, idx + 1));
                    state = State::Code;
                }
            }
            State::Escape(quote) => state = State::Str(quote),
            State::LineComment | State::BlockComment => {}
        }
    }
    if matches!(state, State::Str(_) | State::Escape(_)) {
        spans.push((open, code.len()));
    }

    spans
}

/// 1-based line number of a byte offset.
pub(crate) fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}
