//! Reassembly of values the administrative tool wraps across lines
//!
//! A wrapped value ends with a `\` and continues on the following
//! indented lines:
//!
//! ```text
//! hostlist              node01 node02 node03 \
//!                       node04 node05
//! ```

use crate::errors::{GridConfError, Result};

/// Trailing marker announcing a continuation line
pub const CONTINUATION_MARKER: char = '\\';

/// A logical value and the lines it was assembled from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedValue {
    pub key: String,
    pub value: String,
    /// Whether continuation lines were folded in
    pub folded: bool,
    /// Index of the first line after the value
    pub next_index: usize,
}

fn is_continuation_line(line: &str) -> bool {
    line.starts_with(|c: char| c.is_whitespace()) && !line.trim().is_empty()
}

/// Read the `key value` line at `index` together with its continuation lines
///
/// Once the line at `index` ends with the marker, every indented line
/// directly below it belongs to the value, whether or not the piece
/// before it carried a marker too. Folding stops at the first blank or
/// non-indented line.
///
/// # Errors
///
/// Returns `InvalidLineIndex` if `index` is out of range and `EmptyLine` if
/// the line holds no key.
pub fn fold_at<S: AsRef<str>>(lines: &[S], index: usize) -> Result<FoldedValue> {
    let line = lines
        .get(index)
        .map(|l| l.as_ref())
        .ok_or(GridConfError::InvalidLineIndex {
            index,
            len: lines.len(),
        })?;

    let content = line.trim_start();
    let key = content
        .split_whitespace()
        .next()
        .ok_or(GridConfError::EmptyLine { index })?;
    let rest = content[key.len()..].trim();

    let Some(head) = rest.strip_suffix(CONTINUATION_MARKER) else {
        return Ok(FoldedValue {
            key: key.to_string(),
            value: rest.to_string(),
            folded: false,
            next_index: index + 1,
        });
    };

    // Spacing before the marker is the separator between pieces
    let mut value = head.to_string();
    let mut next = index + 1;
    let mut marked = true;
    while let Some(candidate) = lines.get(next).map(|l| l.as_ref()) {
        if !is_continuation_line(candidate) {
            break;
        }
        // after an unmarked piece the line break is the only separator
        if !marked && !value.ends_with([' ', ',']) {
            value.push(' ');
        }
        let piece = candidate.trim();
        match piece.strip_suffix(CONTINUATION_MARKER) {
            Some(p) => {
                value.push_str(p);
                marked = true;
            }
            None => {
                value.push_str(piece);
                marked = false;
            }
        }
        next += 1;
    }

    Ok(FoldedValue {
        key: key.to_string(),
        value: value.trim_end().to_string(),
        folded: true,
        next_index: next,
    })
}

/// Reassembled value of the line at `index` and whether it was wrapped
///
/// # Errors
///
/// See [`fold_at`].
///
/// ```
/// use gridconf_core::codec::multiline::read_multiline_value;
///
/// let lines = ["hostlist   a b \\", "           c", "seq_no     0"];
/// let (value, folded) = read_multiline_value(&lines, 0).unwrap();
/// assert_eq!(value, "a b c");
/// assert!(folded);
/// ```
pub fn read_multiline_value<S: AsRef<str>>(lines: &[S], index: usize) -> Result<(String, bool)> {
    let folded = fold_at(lines, index)?;
    Ok((folded.value, folded.folded))
}
