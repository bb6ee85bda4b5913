//! Named color variants, schemes that group them, and the context that
//! applies a variant to an environment.

mod apply;
mod scheme;
mod variant;

use std::fmt;
use std::str::FromStr;

pub use apply::{ActiveState, ThemeContext};
pub use scheme::{Scheme, SchemeRegistry};
pub use variant::{ColorProfile, Variant};

use crate::error::{Error, Result};

/// Opaque identifier for one color's role within a variant
/// (`color0`, `base0A`, `background`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(String);

impl Slot {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The ANSI index for `color<N>` slots. `N` is plain decimal without a
    /// sign or leading zeros.
    pub fn ansi_index(&self) -> Option<u8> {
        let digits = self.0.strip_prefix("color")?;
        if digits.is_empty()
            || !digits.bytes().all(|b| b.is_ascii_digit())
            || (digits.len() > 1 && digits.starts_with('0'))
        {
            return None;
        }
        digits.parse().ok()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slot {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Slot {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Slot {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Whether a variant is meant for a dark or a light background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariantKind {
    #[default]
    Dark,
    Light,
}

impl VariantKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariantKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(Error::InvalidArgument(format!(
                "variant kind must be dark or light, got {other:?}"
            ))),
        }
    }
}

/// Split `scheme[:variant]` into its parts.
pub fn parse_identifier(identifier: &str) -> (&str, Option<&str>) {
    match identifier.split_once(':') {
        Some((scheme, variant)) if !variant.is_empty() => (scheme, Some(variant)),
        Some((scheme, _)) => (scheme, None),
        None => (identifier, None),
    }
}
