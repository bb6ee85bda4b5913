use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::theme::Slot;

use super::Environment;

/// Pywal-style `colors.json` consumed by wallust and friends.
///
/// Writes accumulate in memory; `finish` rewrites the whole document, so the
/// file always reflects every slot applied so far.
pub struct PywalFile {
    path: PathBuf,
    slots: BTreeMap<Slot, Color>,
}

#[derive(Debug, Serialize)]
struct Document {
    special: Special,
    colors: AnsiColors,
}

/// `colorN` entries in numeric order (`color2` before `color10`).
#[derive(Debug)]
struct AnsiColors(Vec<(u8, String)>);

impl Serialize for AnsiColors {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.0
                .iter()
                .map(|(index, hex)| (format!("color{index}"), hex)),
        )
    }
}

#[derive(Debug, Serialize)]
struct Special {
    #[serde(skip_serializing_if = "Option::is_none")]
    background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    foreground: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<String>,
}

impl PywalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            slots: BTreeMap::new(),
        }
    }

    /// `$XDG_CACHE_HOME/wal/colors.json`, falling back to `$HOME/.cache`.
    /// Fails when neither variable is set.
    pub fn default_path() -> Result<PathBuf> {
        cache_path(
            std::env::var_os("XDG_CACHE_HOME"),
            std::env::var_os("HOME"),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lookup(&self, slot: &str, fallback: &str) -> Option<String> {
        self.slots
            .get(&Slot::new(slot))
            .or_else(|| self.slots.get(&Slot::new(fallback)))
            .map(|c| c.to_hex())
    }

    fn ansi_colors(&self) -> AnsiColors {
        let mut colors: Vec<(u8, String)> = self
            .slots
            .iter()
            .filter_map(|(slot, color)| Some((slot.ansi_index()?, color.to_hex())))
            .collect();
        colors.sort_by_key(|(index, _)| *index);
        AnsiColors(colors)
    }

    /// Render the current slot state as JSON.
    pub fn serialize(&self) -> Result<String> {
        let document = Document {
            special: Special {
                background: self.lookup("background", "color0"),
                foreground: self.lookup("foreground", "color7"),
                cursor: self.lookup("cursor", "color7"),
            },
            colors: self.ansi_colors(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

fn cache_path(xdg_cache_home: Option<OsString>, home: Option<OsString>) -> Result<PathBuf> {
    let non_empty = |v: Option<OsString>| v.filter(|v| !v.is_empty());
    let cache_home = match (non_empty(xdg_cache_home), non_empty(home)) {
        (Some(cache), _) => PathBuf::from(cache),
        (None, Some(home)) => PathBuf::from(home).join(".cache"),
        (None, None) => {
            return Err(Error::InvalidArgument(
                "cannot locate the cache directory: set XDG_CACHE_HOME or HOME, or pass --output"
                    .to_string(),
            ));
        }
    };
    Ok(cache_home.join("wal").join("colors.json"))
}

impl Environment for PywalFile {
    fn name(&self) -> &str {
        "pywal"
    }

    fn write_slot(&mut self, slot: &Slot, color: Color) -> Result<()> {
        self.slots.insert(slot.clone(), color);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, self.serialize()?)?;
        debug!(path = %self.path.display(), slots = self.slots.len(), "wrote pywal colors");
        Ok(())
    }
}
