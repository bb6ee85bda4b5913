use std::collections::HashSet;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::pipeline::parse::format_canonical;

use super::{Slot, VariantKind};

/// One concrete, named assignment of colors to slots.
///
/// Slots are unique and kept in construction order. A variant cannot be
/// modified once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    name: String,
    kind: VariantKind,
    pairs: Vec<(Slot, Color)>,
}

/// The four roles a scheme summary cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorProfile {
    pub background: Option<Color>,
    pub foreground: Option<Color>,
    pub accent1: Option<Color>,
    pub accent2: Option<Color>,
}

impl Variant {
    /// Build a variant from textual colors, normalizing each one.
    ///
    /// Fails with `InvalidColor` on a malformed hex value and `DuplicateSlot`
    /// when a slot repeats, whichever comes first.
    pub fn create<I, S, C>(name: impl Into<String>, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, C)>,
        S: Into<Slot>,
        C: AsRef<str>,
    {
        let name = name.into();
        let mut seen = HashSet::new();
        let mut validated = Vec::new();
        for (slot, color) in pairs {
            let slot = slot.into();
            let color = Color::from_hex(color.as_ref())?;
            if !seen.insert(slot.clone()) {
                return Err(Error::DuplicateSlot {
                    variant: name,
                    slot: slot.to_string(),
                });
            }
            validated.push((slot, color));
        }
        Ok(Self {
            name,
            kind: VariantKind::default(),
            pairs: validated,
        })
    }

    /// Build a variant from already-normalized colors.
    pub fn from_colors<I, S>(name: impl Into<String>, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Color)>,
        S: Into<Slot>,
    {
        Self::create(
            name,
            pairs.into_iter().map(|(slot, color)| (slot, color.to_hex())),
        )
    }

    pub fn with_kind(mut self, kind: VariantKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> VariantKind {
        self.kind
    }

    pub fn pairs(&self) -> &[(Slot, Color)] {
        &self.pairs
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

    fn role(&self, slot: &str, fallback: &str) -> Option<Color> {
        self.get(slot).or_else(|| self.get(fallback))
    }

    /// `background`, else `color0`.
    pub fn background(&self) -> Option<Color> {
        self.role("background", "color0")
    }

    /// `foreground`, else `color7`.
    pub fn foreground(&self) -> Option<Color> {
        self.role("foreground", "color7")
    }

    /// `cursor`, else `color7`.
    pub fn cursor(&self) -> Option<Color> {
        self.role("cursor", "color7")
    }

    pub fn profile(&self) -> ColorProfile {
        ColorProfile {
            background: self.background(),
            foreground: self.foreground(),
            accent1: self.get("color1"),
            accent2: self.get("color4"),
        }
    }

    /// The `color<N>` entry with the highest contrast against the background.
    /// Ties go to the earlier slot.
    pub fn most_contrasting(&self) -> Option<Color> {
        let bg = self.background()?;
        let mut best: Option<(Color, f32)> = None;
        for (slot, color) in &self.pairs {
            if slot.ansi_index().is_none() {
                continue;
            }
            let ratio = Color::contrast_ratio(color, &bg);
            if best.map_or(true, |(_, r)| ratio > r) {
                best = Some((*color, ratio));
            }
        }
        best.map(|(c, _)| c)
    }

    pub fn to_canonical_text(&self) -> String {
        format_canonical(self.pairs.iter().map(|(s, c)| (s, *c)))
    }
}
