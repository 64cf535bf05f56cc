//! Override-list grammar
//!
//! List attributes mix plain tokens with bracketed override clauses, e.g.
//! `slots=10,mem_free=1G,[sim1=slots=20,mem_free=2G]`. Decoding keeps the
//! input order; encoding always moves overrides behind the plain tokens,
//! which is where the scheduler itself prints them.

use crate::errors::{GridConfError, Result};

/// Literal used by the scheduler for an empty list
pub const NONE: &str = "NONE";

/// Top-level separator layout of a list value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// `a,b,[h=c]`
    Comma,
    /// `a b,[h=c d]`: spaces split the first comma segment, commas after that
    SpaceLeading,
}

impl ListFormat {
    /// Separator used between plain tokens when encoding
    pub fn separator(&self) -> &'static str {
        match self {
            ListFormat::Comma => ",",
            ListFormat::SpaceLeading => " ",
        }
    }
}

/// True for a token carrying an override clause
pub fn is_override(token: &str) -> bool {
    token.contains('[')
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    let token = current.trim();
    if !token.is_empty() {
        tokens.push(token.to_string());
    }
    current.clear();
}

/// Split a raw list value into its ordered tokens
///
/// Separators inside brackets are not split points. `NONE` (any case) and
/// an empty value decode to an empty list.
///
/// # Errors
///
/// Returns `UnbalancedBrackets` for a `]` without an open bracket or a `[`
/// that is never closed.
///
/// ```
/// use gridconf_core::codec::override_list::{decode, ListFormat};
///
/// let tokens = decode("pe1,p2,[host=p2],[master=pe1]", ListFormat::Comma).unwrap();
/// assert_eq!(tokens, vec!["pe1", "p2", "[host=p2]", "[master=pe1]"]);
/// ```
pub fn decode(raw: &str, format: ListFormat) -> Result<Vec<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NONE) {
        return Ok(Vec::new());
    }

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut open_at = 0usize;
    // SpaceLeading: spaces only separate until the first top-level comma
    let mut in_first_segment = true;

    for (pos, ch) in raw.char_indices() {
        match ch {
            '[' => {
                if depth == 0 {
                    flush(&mut current, &mut tokens);
                    open_at = pos;
                }
                depth += 1;
                current.push(ch);
            }
            ']' => {
                if depth == 0 {
                    return Err(GridConfError::UnbalancedBrackets {
                        raw: raw.to_string(),
                        position: pos,
                    });
                }
                depth -= 1;
                current.push(ch);
                if depth == 0 {
                    flush(&mut current, &mut tokens);
                }
            }
            ',' if depth == 0 => {
                flush(&mut current, &mut tokens);
                in_first_segment = false;
            }
            c if c.is_whitespace()
                && depth == 0
                && in_first_segment
                && format == ListFormat::SpaceLeading =>
            {
                flush(&mut current, &mut tokens);
            }
            _ => current.push(ch),
        }
    }

    if depth > 0 {
        return Err(GridConfError::UnbalancedBrackets {
            raw: raw.to_string(),
            position: open_at,
        });
    }
    flush(&mut current, &mut tokens);
    Ok(tokens)
}

/// Join tokens back into a list value
///
/// Plain tokens are joined by `separator` and come first; override tokens
/// follow, always comma-joined, with a comma bridging the two groups. An
/// empty list encodes as `NONE`.
///
/// ```
/// use gridconf_core::codec::override_list::encode;
///
/// let tokens = vec!["[h1=mpi]".to_string(), "make".to_string(), "smp".to_string()];
/// assert_eq!(encode(&tokens, " "), "make smp,[h1=mpi]");
/// assert_eq!(encode::<&str>(&[], ","), "NONE");
/// ```
pub fn encode<S: AsRef<str>>(tokens: &[S], separator: &str) -> String {
    if tokens.is_empty() {
        return NONE.to_string();
    }
    let (overrides, plain): (Vec<&str>, Vec<&str>) = tokens
        .iter()
        .map(|t| t.as_ref())
        .partition(|t| is_override(t));

    let mut out = plain.join(separator);
    if !overrides.is_empty() {
        if !out.is_empty() {
            out.push(',');
        }
        out.push_str(&overrides.join(","));
    }
    out
}

/// Join a plain list; empty lists render as `NONE`
pub fn join_list<S: AsRef<str>>(items: &[S], separator: &str) -> String {
    if items.is_empty() {
        return NONE.to_string();
    }
    items
        .iter()
        .map(|i| i.as_ref())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Split an override token `[scope=v1,v2]` into its scope and values
///
/// Values are split on commas and whitespace; returns `None` for a plain
/// token or an override without `=`.
pub fn split_override(token: &str) -> Option<(&str, Vec<&str>)> {
    let inner = token.trim().strip_prefix('[')?.strip_suffix(']')?;
    let (scope, values) = inner.split_once('=')?;
    let values = values
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|v| !v.is_empty())
        .collect();
    Some((scope.trim(), values))
}
