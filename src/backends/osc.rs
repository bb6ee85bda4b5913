use std::io::Write;

use tracing::debug;

use crate::color::Color;
use crate::error::Result;
use crate::theme::Slot;

use super::Environment;

/// Sets colors of a running terminal through OSC escape sequences.
///
/// `color<N>` maps to OSC 4 (palette entry N), `foreground`, `background`
/// and `cursor` to OSC 10, 11 and 12. Other slots have no terminal
/// counterpart and are skipped.
pub struct OscTerminal<W: Write> {
    out: W,
}

impl<W: Write> OscTerminal<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// The escape sequence for `slot`, if the terminal has one.
pub fn sequence(slot: &Slot, color: Color) -> Option<String> {
    let target = match (slot.as_str(), slot.ansi_index()) {
        (_, Some(index)) => format!("4;{index}"),
        ("foreground", None) => "10".to_string(),
        ("background", None) => "11".to_string(),
        ("cursor", None) => "12".to_string(),
        _ => return None,
    };
    Some(format!("\x1b]{target};{color}\x1b\\"))
}

impl<W: Write> Environment for OscTerminal<W> {
    fn name(&self) -> &str {
        "terminal"
    }

    fn write_slot(&mut self, slot: &Slot, color: Color) -> Result<()> {
        match sequence(slot, color) {
            Some(seq) => self.out.write_all(seq.as_bytes())?,
            None => debug!(%slot, "no terminal sequence for slot, skipping"),
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
