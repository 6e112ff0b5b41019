// src/extractors/tags.rs
//! Best-effort scanner for the pseudo-XML tags embedded in paragraph text.
//!
//! EP amendment templates carry markers like `<NumAm>12</NumAm>` or
//! `<Article>Article 4</Article>` as literal text. These are not real XML:
//! they are matched as flat, non-nested pairs and anything malformed is
//! simply not returned.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Value of a tag: a single string, or every value in encounter order once
/// the tag has been seen more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Single(String),
    Multiple(Vec<String>),
}

impl TagValue {
    /// The single value, or the first of several.
    pub fn first(&self) -> Option<&str> {
        match self {
            TagValue::Single(v) => Some(v.as_str()),
            TagValue::Multiple(vs) => vs.first().map(String::as_str),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Single(v) => Some(v.as_str()),
            TagValue::Multiple(_) => None,
        }
    }

    /// All values, whether one or many.
    pub fn values(&self) -> Vec<&str> {
        match self {
            TagValue::Single(v) => vec![v.as_str()],
            TagValue::Multiple(vs) => vs.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            TagValue::Single(first) => {
                let first = std::mem::take(first);
                *self = TagValue::Multiple(vec![first, value]);
            }
            TagValue::Multiple(vs) => vs.push(value),
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Single(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::Single(value)
    }
}

impl From<Vec<String>> for TagValue {
    fn from(values: Vec<String>) -> Self {
        TagValue::Multiple(values)
    }
}

/// Tag name to value, in first-encounter order.
pub type TagMap = IndexMap<String, TagValue>;

/// Positions of every `>` and of every `</token>` in a text, so each
/// opening tag can find its close without rescanning the rest of the text.
struct TagIndex<'a> {
    gt_positions: Vec<usize>,
    closes: HashMap<&'a str, Vec<usize>>,
}

impl<'a> TagIndex<'a> {
    fn new(text: &'a str) -> Self {
        let gt_positions: Vec<usize> = text.match_indices('>').map(|(i, _)| i).collect();

        let mut closes: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (start, _) in text.match_indices("</") {
            if let Some(gt) = first_at_or_after(&gt_positions, start + 2) {
                if gt > start + 2 {
                    closes.entry(&text[start + 2..gt]).or_default().push(start);
                }
            }
        }

        Self { gt_positions, closes }
    }

    fn next_gt(&self, from: usize) -> Option<usize> {
        first_at_or_after(&self.gt_positions, from)
    }

    /// Start of the first `</token>` at or after `from`.
    fn close_of(&self, token: &str, from: usize) -> Option<usize> {
        self.closes
            .get(token)
            .and_then(|positions| first_at_or_after(positions, from))
    }
}

fn first_at_or_after(sorted: &[usize], from: usize) -> Option<usize> {
    let idx = sorted.partition_point(|&p| p < from);
    sorted.get(idx).copied()
}

/// Scans `text` for `<token>content</token>` pairs.
///
/// Matching runs left to right without overlap. The token is everything
/// between `<` and the next `>`, and the close must repeat it exactly, so
/// `<Big x>y</Big x>` pairs up while `<Date type="x">v</Date>` does not.
/// Content extends to the first such close (non-greedy, across newlines).
/// The key is the token up to its first space. An opening tag with no close
/// is skipped and the scan moves on to the next `<`, which lets tags written
/// inside it still match. Values are trimmed.
pub fn parse_tags(text: &str) -> TagMap {
    let index = TagIndex::new(text);
    let mut tags = TagMap::new();
    let mut cursor = 0;

    for (open_start, _) in text.match_indices('<') {
        if open_start < cursor {
            continue;
        }
        // No '>' left means no tag can open from here on.
        let Some(open_end) = index.next_gt(open_start + 1) else {
            break;
        };
        if open_end == open_start + 1 {
            continue;
        }

        let token = &text[open_start + 1..open_end];
        let Some(close_start) = index.close_of(token, open_end + 1) else {
            continue;
        };

        let name = token
            .split(' ')
            .next()
            .unwrap_or("")
            .trim_matches(&['<', '>'][..]);
        let content = text[open_end + 1..close_start].trim().to_string();
        match tags.get_mut(name) {
            Some(existing) => existing.push(content),
            None => {
                tags.insert(name.to_string(), TagValue::Single(content));
            }
        }
        cursor = close_start + token.len() + 3;
    }

    tags
}
