use std::collections::BTreeMap;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::theme::Slot;

use super::Environment;

/// Records every write and the resulting slot state. Backs `--dry-run`.
#[derive(Debug, Clone, Default)]
pub struct MemoryEnvironment {
    writes: Vec<(Slot, Color)>,
    state: BTreeMap<Slot, Color>,
    fail_after: Option<usize>,
}

impl MemoryEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `n` writes, then fail every further one.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    /// Every write in the order it was received.
    pub fn writes(&self) -> &[(Slot, Color)] {
        &self.writes
    }

    /// Current value of every slot ever written.
    pub fn state(&self) -> &BTreeMap<Slot, Color> {
        &self.state
    }

    pub fn color(&self, slot: &Slot) -> Option<Color> {
        self.state.get(slot).copied()
    }
}

impl Environment for MemoryEnvironment {
    fn name(&self) -> &str {
        "memory"
    }

    fn write_slot(&mut self, slot: &Slot, color: Color) -> Result<()> {
        if self.fail_after.is_some_and(|n| self.writes.len() >= n) {
            return Err(Error::Io(std::io::Error::other(format!(
                "environment rejected write to {slot}"
            ))));
        }
        self.writes.push((slot.clone(), color));
        self.state.insert(slot.clone(), color);
        Ok(())
    }
}
