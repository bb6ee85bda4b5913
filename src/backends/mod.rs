//! Environments a variant can be applied to.

pub mod memory;
pub mod osc;
pub mod pywal;

use crate::color::Color;
use crate::error::Result;
use crate::theme::Slot;

/// Receives the ordered slot/color writes of an applied variant.
///
/// Writes are best-effort and immediate. There is no acknowledgment or
/// rollback: a failure part way through leaves earlier writes in place.
pub trait Environment {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Set one slot. Backends ignore slots they have no place for.
    fn write_slot(&mut self, slot: &Slot, color: Color) -> Result<()>;

    /// Called once after the last slot of an apply.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<E: Environment + ?Sized> Environment for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn write_slot(&mut self, slot: &Slot, color: Color) -> Result<()> {
        (**self).write_slot(slot, color)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}
