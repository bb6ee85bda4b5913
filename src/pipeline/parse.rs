use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::theme::{Slot, Variant};

/// One `slot: color` line, tolerating list bullets, quoting, `=` separators,
/// trailing punctuation and a trailing comment. A double-quoted slot may hold
/// any character, with `\"`, `\\`, `\n` and `\r` escapes.
static PAIR_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r##"(?x)
        ^\s*
        (?:[-*+>]\s*)?
        `?
        (?:
            "(?P<quoted>(?:[^"\\]|\\.)*)"
          | ["']?(?P<slot>[A-Za-z0-9_.-]+)["']?
        )
        `?
        \s*[:=]\s*
        `?
        ["']?\#?(?P<hex>[0-9A-Fa-f]{6})["']?
        `?
        \s*[,;]?
        (?:\s+(?:\#|//|--|\().*)?
        \s*$
        "##,
    )
    .expect("slot/color pattern is valid")
});

/// A non-empty input line that did not match the slot/color grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the input.
    pub line_number: usize,
    pub content: String,
}

/// Slot/color pairs recovered from free-form text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPalette {
    pairs: Vec<(Slot, Color)>,
    skipped: Vec<SkippedLine>,
}

impl ParsedPalette {
    /// Pairs in first-occurrence order of each slot.
    pub fn pairs(&self) -> &[(Slot, Color)] {
        &self.pairs
    }

    /// Non-matching lines, for diagnostics.
    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }

    pub fn get(&self, slot: &str) -> Option<Color> {
        self.pairs
            .iter()
            .find(|(s, _)| s.as_str() == slot)
            .map(|(_, c)| *c)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Build a variant from the recovered pairs.
    pub fn into_variant(self, name: impl Into<String>) -> Result<Variant> {
        Variant::from_colors(name, self.pairs)
    }
}

/// Extract every recognizable `slot: color` line from `text`.
///
/// Non-matching lines are skipped and reported through
/// [`ParsedPalette::skipped`]. A repeated slot keeps its first position but
/// takes the color of its last occurrence. Fails with `ParseEmpty` only when
/// nothing at all matched.
pub fn parse_palette_text(text: &str) -> Result<ParsedPalette> {
    let mut pairs: Vec<(Slot, Color)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut skipped = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let Some(caps) = PAIR_LINE.captures(line) else {
            skipped.push(SkippedLine {
                line_number: idx + 1,
                content: line.to_string(),
            });
            continue;
        };
        let slot = match caps.name("quoted") {
            Some(quoted) => unescape_slot(quoted.as_str()),
            None => caps["slot"].to_string(),
        };
        let slot = slot.as_str();
        let color = Color::from_hex(&caps["hex"])?;
        match positions.get(slot) {
            Some(&pos) => {
                debug!(slot, previous = %pairs[pos].1, %color, line = idx + 1, "slot redefined, last value wins");
                pairs[pos].1 = color;
            }
            None => {
                positions.insert(slot.to_string(), pairs.len());
                pairs.push((Slot::new(slot), color));
            }
        }
    }

    if pairs.is_empty() {
        return Err(Error::ParseEmpty {
            skipped: skipped.len(),
        });
    }
    if !skipped.is_empty() {
        warn!(
            parsed = pairs.len(),
            skipped = skipped.len(),
            "skipped lines without a slot/color pair"
        );
    }
    Ok(ParsedPalette { pairs, skipped })
}

fn unescape_slot(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Slots that read back unchanged without quotes. A leading `-` would be
/// taken for a list bullet.
fn is_bare_slot(slot: &str) -> bool {
    !slot.is_empty()
        && !slot.starts_with('-')
        && slot
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

fn quote_slot(slot: &str) -> String {
    let mut out = String::with_capacity(slot.len() + 2);
    out.push('"');
    for c in slot.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render pairs in the canonical `<slot>: "#rrggbb"` line format. Slots
/// outside `[A-Za-z0-9_.-]` are written double-quoted.
pub fn format_canonical<I, S>(pairs: I) -> String
where
    I: IntoIterator<Item = (S, Color)>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (slot, color) in pairs {
        let slot = slot.as_ref();
        if is_bare_slot(slot) {
            out.push_str(&format!("{slot}: \"{}\"\n", color.to_hex()));
        } else {
            out.push_str(&format!("{}: \"{}\"\n", quote_slot(slot), color.to_hex()));
        }
    }
    out
}
