//! Parsing of index selections like `1,5-7,12` or `all`.

use std::collections::HashSet;

use crate::{Error, Result};

fn bound(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // All digits, so failure can only be overflow: far out of range anyway.
    Some(s.parse().unwrap_or(usize::MAX))
}

/// Parse a selection into 1-based indices, in the order given.
///
/// `all` / `*` selects `1..=max_index`. Otherwise the expression is a list of
/// single indices and inclusive `a-b` ranges separated by commas and/or
/// whitespace. Reversed ranges are swapped, out-of-range indices are dropped
/// and repeats keep their first position.
pub fn parse_selection(expr: &str, max_index: usize) -> Result<Vec<usize>> {
    let expr = expr.trim().to_lowercase();
    if expr == "all" || expr == "*" {
        return Ok((1..=max_index).collect());
    }

    let mut ordered = Vec::new();
    let mut seen = HashSet::new();
    let mut push = |i: usize| {
        if (1..=max_index).contains(&i) && seen.insert(i) {
            ordered.push(i);
        }
    };

    for token in expr
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        if let Some((a, b)) = token.split_once('-') {
            let (Some(start), Some(end)) = (bound(a), bound(b)) else {
                return Err(Error::Selection {
                    kind: "range",
                    token: token.to_string(),
                });
            };
            let (start, end) = if start > end { (end, start) } else { (start, end) };
            for i in start.max(1)..=end.min(max_index) {
                push(i);
            }
        } else {
            let Some(i) = bound(token) else {
                return Err(Error::Selection {
                    kind: "index",
                    token: token.to_string(),
                });
            };
            push(i);
        }
    }

    Ok(ordered)
}
