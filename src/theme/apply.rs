use tracing::{debug, info};

use crate::backends::Environment;
use crate::color::Color;
use crate::error::Result;

use super::{Scheme, Slot, Variant};

/// Which (scheme, variant) pair was last applied through a [`ThemeContext`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveState {
    #[default]
    None,
    Applied { scheme: String, variant: String },
}

impl ActiveState {
    pub fn is_applied(&self, scheme: &str, variant: &str) -> bool {
        matches!(self, Self::Applied { scheme: s, variant: v } if s == scheme && v == variant)
    }
}

/// Caller-owned context pairing an environment with the record of what was
/// applied to it.
///
/// Applying is not atomic. Slots are written one at a time, so a concurrent
/// reader of the environment can observe a mix of the previous and the new
/// variant, and a write error leaves the environment partially updated while
/// [`ActiveState`] still names the previous pair. Two contexts sharing one
/// environment race with last-write-wins semantics.
#[derive(Debug)]
pub struct ThemeContext<E> {
    environment: E,
    active: ActiveState,
    // Pairs of the active variant, so a same-named variant from another
    // scheme instance is not mistaken for the one already written.
    written: Vec<(Slot, Color)>,
}

impl<E: Environment> ThemeContext<E> {
    pub fn new(environment: E) -> Self {
        Self {
            environment,
            active: ActiveState::None,
            written: Vec::new(),
        }
    }

    pub fn active(&self) -> &ActiveState {
        &self.active
    }

    pub fn environment(&self) -> &E {
        &self.environment
    }

    pub fn into_environment(self) -> E {
        self.environment
    }

    /// Write every slot of `scheme`'s `variant_name` to the environment in
    /// variant order, then record it as active.
    ///
    /// Re-applying the active pair with the same colors writes nothing. A
    /// variant that shares the active names but carries other colors is
    /// written in full.
    pub fn apply<'s>(&mut self, scheme: &'s Scheme, variant_name: &str) -> Result<&'s Variant> {
        let variant = scheme.variant(variant_name)?;
        if self.active.is_applied(scheme.name(), variant.name())
            && self.written == variant.pairs()
        {
            debug!(scheme = scheme.name(), variant = variant.name(), "already active, nothing to write");
            return Ok(variant);
        }

        // A failed write below leaves the environment partially updated, so
        // the previous pair must not be skipped on the next apply.
        self.written.clear();
        for (slot, color) in variant.pairs() {
            self.environment.write_slot(slot, *color)?;
        }
        self.environment.finish()?;

        self.active = ActiveState::Applied {
            scheme: scheme.name().to_string(),
            variant: variant.name().to_string(),
        };
        self.written = variant.pairs().to_vec();
        info!(
            scheme = scheme.name(),
            variant = variant.name(),
            kind = %variant.kind(),
            environment = self.environment.name(),
            "applied variant"
        );
        Ok(variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::memory::MemoryEnvironment;
    use crate::error::Error;

    fn scheme() -> Scheme {
        let mut scheme = Scheme::create("gruvbox");
        scheme
            .add_variant(
                Variant::create("dark", [("color0", "#282828"), ("color1", "#cc241d")]).unwrap(),
            )
            .unwrap();
        scheme
            .add_variant(
                Variant::create("light", [("color0", "#fbf1c7"), ("color2", "#98971a")]).unwrap(),
            )
            .unwrap();
        scheme
    }

    #[test]
    fn starts_with_nothing_applied() {
        let ctx = ThemeContext::new(MemoryEnvironment::new());
        assert_eq!(ctx.active(), &ActiveState::None);
    }

    #[test]
    fn apply_writes_pairs_in_order_and_records_state() {
        let scheme = scheme();
        let mut ctx = ThemeContext::new(MemoryEnvironment::new());
        ctx.apply(&scheme, "dark").unwrap();

        assert!(ctx.active().is_applied("gruvbox", "dark"));
        let writes: Vec<(&str, String)> = ctx
            .environment()
            .writes()
            .iter()
            .map(|(s, c)| (s.as_str(), c.to_hex()))
            .collect();
        assert_eq!(
            writes,
            [("color0", "#282828".to_string()), ("color1", "#cc241d".to_string())]
        );
    }

    #[test]
    fn apply_twice_is_idempotent() {
        let scheme = scheme();
        let mut ctx = ThemeContext::new(MemoryEnvironment::new());
        ctx.apply(&scheme, "dark").unwrap();
        let state_after_first = ctx.environment().state().clone();
        let writes_after_first = ctx.environment().writes().len();

        ctx.apply(&scheme, "dark").unwrap();
        assert_eq!(
            ctx.active(),
            &ActiveState::Applied {
                scheme: "gruvbox".to_string(),
                variant: "dark".to_string()
            }
        );
        assert_eq!(ctx.environment().state(), &state_after_first);
        assert_eq!(ctx.environment().writes().len(), writes_after_first);
    }

    #[test]
    fn same_names_with_other_colors_are_rewritten() {
        let mut first = Scheme::create("gruvbox");
        first
            .add_variant(Variant::create("dark", [("color0", "#282828")]).unwrap())
            .unwrap();
        let mut second = Scheme::create("gruvbox");
        second
            .add_variant(Variant::create("dark", [("color0", "#ff0000")]).unwrap())
            .unwrap();

        let mut ctx = ThemeContext::new(MemoryEnvironment::new());
        ctx.apply(&first, "dark").unwrap();
        ctx.apply(&second, "dark").unwrap();

        assert_eq!(
            ctx.environment().color(&Slot::new("color0")),
            Some(Color::new(0xff, 0, 0))
        );
        assert_eq!(ctx.environment().writes().len(), 2);
        assert!(ctx.active().is_applied("gruvbox", "dark"));

        // Same names and same colors again: nothing new is written.
        ctx.apply(&second, "dark").unwrap();
        assert_eq!(ctx.environment().writes().len(), 2);
    }

    #[test]
    fn switching_variants_overwrites_shared_slots_only() {
        let scheme = scheme();
        let mut ctx = ThemeContext::new(MemoryEnvironment::new());
        ctx.apply(&scheme, "dark").unwrap();
        ctx.apply(&scheme, "light").unwrap();

        let env = ctx.environment();
        assert_eq!(env.color(&Slot::new("color0")), Some(Color::new(0xfb, 0xf1, 0xc7)));
        // Not part of "light", so the previous value stays visible.
        assert_eq!(env.color(&Slot::new("color1")), Some(Color::new(0xcc, 0x24, 0x1d)));
        assert!(ctx.active().is_applied("gruvbox", "light"));
    }

    #[test]
    fn unknown_variant_leaves_state_untouched() {
        let scheme = scheme();
        let mut ctx = ThemeContext::new(MemoryEnvironment::new());
        ctx.apply(&scheme, "dark").unwrap();

        let err = ctx.apply(&scheme, "sepia").unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert!(ctx.active().is_applied("gruvbox", "dark"));
        assert_eq!(ctx.environment().writes().len(), 2);
    }

    #[test]
    fn failed_write_keeps_previous_state() {
        let scheme = scheme();
        let mut ctx = ThemeContext::new(MemoryEnvironment::failing_after(3));
        ctx.apply(&scheme, "dark").unwrap();

        assert!(ctx.apply(&scheme, "light").is_err());
        assert!(ctx.active().is_applied("gruvbox", "dark"));
        // The first slot of "light" landed before the failure.
        assert_eq!(
            ctx.environment().color(&Slot::new("color0")),
            Some(Color::new(0xfb, 0xf1, 0xc7))
        );
    }
}
