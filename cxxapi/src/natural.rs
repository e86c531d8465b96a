//! Natural ordering: runs of digits compare by numeric value.
//!
//! `"Foo2"` sorts before `"Foo10"`. Text runs compare by code point. Strings
//! that tie on natural order (`"a01"` / `"a1"`) fall back to plain byte order
//! so the result never depends on the input order.

use std::cmp::Ordering;

#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Text(&'a str),
    Number(&'a str),
}

impl Chunk<'_> {
    fn cmp_same_kind(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Chunk::Number(a), Chunk::Number(b)) => cmp_digits(a, b),
            (Chunk::Text(a), Chunk::Text(b)) => a.cmp(b),
            // Chunks alternate starting with text, so kinds line up.
            (Chunk::Text(_), Chunk::Number(_)) => Ordering::Greater,
            (Chunk::Number(_), Chunk::Text(_)) => Ordering::Less,
        }
    }
}

/// Split into alternating text/number chunks, always starting with text
/// (possibly empty).
fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits = false;
    for (idx, c) in s.char_indices() {
        let is_digit = c.is_ascii_digit();
        if is_digit != in_digits {
            out.push(if in_digits {
                Chunk::Number(&s[start..idx])
            } else {
                Chunk::Text(&s[start..idx])
            });
            start = idx;
            in_digits = is_digit;
        }
    }
    if start < s.len() || out.is_empty() {
        out.push(if in_digits {
            Chunk::Number(&s[start..])
        } else {
            Chunk::Text(&s[start..])
        });
    }
    out
}

fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let left = chunks(a);
    let right = chunks(b);
    for (l, r) in left.iter().zip(right.iter()) {
        let ord = l.cmp_same_kind(r);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len()).then_with(|| a.cmp(b))
}

pub fn natural_sort(items: &mut [String]) {
    items.sort_by(|a, b| natural_cmp(a, b));
}
