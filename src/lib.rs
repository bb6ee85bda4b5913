//! Extract dominant colors from images, name them, recover slot/color
//! assignments from generated text, and apply the resulting themes.

pub mod backends;
pub mod cli;
pub mod color;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod preview;
pub mod theme;

pub use color::Color;
pub use error::{Error, Result};
