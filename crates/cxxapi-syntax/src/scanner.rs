//! Bracket scanner: depth tracking over `()`, `<>` and `{}`.
//!
//! Angle brackets are not counted while inside parentheses, so comparison and
//! shift operators inside casts or `decltype(...)` leave template depth alone.
//! A `>` directly after `-` is an arrow and never closes an angle bracket.

use std::str::CharIndices;

/// Nesting depths at one point of a scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Depth {
    pub paren: u32,
    pub angle: u32,
    pub brace: u32,
}

impl Depth {
    /// Account for `c`. `prev` is the character just before it.
    pub fn feed(&mut self, prev: Option<char>, c: char) {
        match c {
            '(' => self.paren += 1,
            ')' => self.paren = self.paren.saturating_sub(1),
            '{' => self.brace += 1,
            '}' => self.brace = self.brace.saturating_sub(1),
            '<' if self.paren == 0 => self.angle += 1,
            '>' if self.paren == 0 && prev != Some('-') => {
                self.angle = self.angle.saturating_sub(1)
            }
            _ => {}
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.paren == 0 && self.angle == 0 && self.brace == 0
    }
}

/// Iterator over `(byte_index, char, at_top_level)`.
///
/// `at_top_level` reflects the depths after the character has been consumed.
pub struct TopLevel<'a> {
    chars: CharIndices<'a>,
    depth: Depth,
    prev: Option<char>,
}

impl Iterator for TopLevel<'_> {
    type Item = (usize, char, bool);

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, c) = self.chars.next()?;
        self.depth.feed(self.prev, c);
        self.prev = Some(c);
        Some((idx, c, self.depth.is_top_level()))
    }
}

pub fn top_level(s: &str) -> TopLevel<'_> {
    TopLevel {
        chars: s.char_indices(),
        depth: Depth::default(),
        prev: None,
    }
}

/// Byte index of the first `ch` that sits outside every bracket pair.
pub fn find_top_level(s: &str, ch: char) -> Option<usize> {
    top_level(s)
        .find(|&(_, c, at_top)| c == ch && at_top)
        .map(|(idx, _, _)| idx)
}

/// Split on `delim` only where it appears outside brackets.
///
/// Pieces are trimmed and empty pieces are dropped.
pub fn split_top_level(s: &str, delim: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, c, at_top) in top_level(s) {
        if c == delim && at_top {
            pieces.push(&s[start..idx]);
            start = idx + c.len_utf8();
        }
    }
    pieces.push(&s[start..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Find the byte index of the bracket closing the one at `open_idx`.
///
/// Supports `(`, `<`, `{` and `[`. Angle matching skips parenthesised text
/// and arrows. Returns `None` when the text is unbalanced or `open_idx` does
/// not hold an opening bracket.
pub fn find_matching(s: &str, open_idx: usize) -> Option<usize> {
    let tail = s.get(open_idx..)?;
    let open = tail.chars().next()?;
    let close = match open {
        '(' => ')',
        '<' => '>',
        '{' => '}',
        '[' => ']',
        _ => return None,
    };

    let mut depth: u32 = 0;
    let mut paren: u32 = 0;
    let mut prev = None;
    for (offset, c) in tail.char_indices() {
        if open == '<' {
            match c {
                '(' => paren += 1,
                ')' => paren = paren.saturating_sub(1),
                '<' if paren == 0 => depth += 1,
                '>' if paren == 0 && prev != Some('-') => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(open_idx + offset);
                    }
                }
                _ => {}
            }
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(open_idx + offset);
            }
        }
        prev = Some(c);
    }
    None
}
