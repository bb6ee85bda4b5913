use tracing::debug;

use crate::error::{Error, Result};

use super::{parse_identifier, Variant, VariantKind};

/// A named collection of variants sharing one theme identity.
///
/// Variants are kept in registration order; the first one registered is the
/// default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheme {
    name: String,
    variants: Vec<Variant>,
}

impl Scheme {
    /// An empty scheme.
    pub fn create(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `variant` under its own name.
    pub fn add_variant(&mut self, variant: Variant) -> Result<&Variant> {
        if self.variants.iter().any(|v| v.name() == variant.name()) {
            return Err(Error::DuplicateName {
                kind: "variant",
                name: variant.name().to_string(),
            });
        }
        debug!(scheme = %self.name, variant = variant.name(), slots = variant.len(), "added variant");
        self.variants.push(variant);
        Ok(&self.variants[self.variants.len() - 1])
    }

    pub fn variant(&self, name: &str) -> Result<&Variant> {
        self.variants
            .iter()
            .find(|v| v.name() == name)
            .ok_or_else(|| Error::NotFound {
                kind: "variant",
                name: format!("{}:{name}", self.name),
            })
    }

    pub fn variants(&self) -> impl Iterator<Item = &Variant> {
        self.variants.iter()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn default_variant(&self) -> Result<&Variant> {
        self.variants.first().ok_or_else(|| Error::NotFound {
            kind: "variant",
            name: format!("{}:<default>", self.name),
        })
    }

    /// Resolve a selector: an exact variant name, else `dark`/`light` for the
    /// first variant of that kind.
    pub fn select(&self, selector: &str) -> Result<&Variant> {
        if let Ok(variant) = self.variant(selector) {
            return Ok(variant);
        }
        let kind: VariantKind = selector.parse().map_err(|_| Error::NotFound {
            kind: "variant",
            name: format!("{}:{selector}", self.name),
        })?;
        self.variants
            .iter()
            .find(|v| v.kind() == kind)
            .ok_or_else(|| Error::NotFound {
                kind: "variant",
                name: format!("{}:{selector}", self.name),
            })
    }

    /// Variants ordered by ascending background brightness. Variants without
    /// a background sort first; equal brightness keeps registration order.
    pub fn variants_by_brightness(&self) -> Vec<&Variant> {
        let mut sorted: Vec<&Variant> = self.variants.iter().collect();
        sorted.sort_by(|a, b| {
            let ka = a.background().map(|c| c.brightness());
            let kb = b.background().map(|c| c.brightness());
            match (ka, kb) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (None, Some(_)) => std::cmp::Ordering::Less,
                (Some(_), None) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        });
        sorted
    }
}

/// In-memory set of schemes, unique by name.
#[derive(Debug, Clone, Default)]
pub struct SchemeRegistry {
    schemes: Vec<Scheme>,
}

impl SchemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, scheme: Scheme) -> Result<&mut Scheme> {
        if self.schemes.iter().any(|s| s.name() == scheme.name()) {
            return Err(Error::DuplicateName {
                kind: "scheme",
                name: scheme.name().to_string(),
            });
        }
        self.schemes.push(scheme);
        let last = self.schemes.len() - 1;
        Ok(&mut self.schemes[last])
    }

    pub fn get(&self, name: &str) -> Result<&Scheme> {
        self.schemes
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| scheme_not_found(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Scheme> {
        self.schemes
            .iter_mut()
            .find(|s| s.name() == name)
            .ok_or_else(|| scheme_not_found(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemes.iter().map(Scheme::name)
    }

    /// Resolve `scheme[:selector]`; without a selector the scheme's default
    /// variant is used.
    pub fn resolve(&self, identifier: &str) -> Result<(&Scheme, &Variant)> {
        let (scheme_name, selector) = parse_identifier(identifier);
        let scheme = self.get(scheme_name)?;
        let variant = match selector {
            Some(selector) => scheme.select(selector)?,
            None => scheme.default_variant()?,
        };
        Ok((scheme, variant))
    }
}

fn scheme_not_found(name: &str) -> Error {
    Error::NotFound {
        kind: "scheme",
        name: name.to_string(),
    }
}
