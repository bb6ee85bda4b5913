use crossterm::style::{Color as TermColor, Stylize};

use crate::color::Color;

const SWATCHES_PER_ROW: usize = 8;

fn to_term(c: Color) -> TermColor {
    TermColor::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Choose black or white foreground for readable text on the given background.
fn contrast_fg(c: Color) -> TermColor {
    if c.relative_luminance() > 0.4 {
        TermColor::Black
    } else {
        TermColor::White
    }
}

/// Render labeled swatches, eight per row, each followed by its hex value on
/// the line below.
pub fn render_swatches(entries: &[(String, Color)]) -> String {
    let mut out = String::new();
    for row in entries.chunks(SWATCHES_PER_ROW) {
        out.push_str("  ");
        for (label, color) in row {
            let text = format!("{:^9}", truncate(label, 9));
            out.push_str(&format!(
                "{} ",
                text.with(contrast_fg(*color)).on(to_term(*color))
            ));
        }
        out.push('\n');
        out.push_str("  ");
        for (_, color) in row {
            out.push_str(&format!("{} ", format!("{:^9}", color.to_hex()).dark_grey()));
        }
        out.push('\n');
    }
    out
}

fn truncate(label: &str, width: usize) -> &str {
    match label.char_indices().nth(width) {
        Some((idx, _)) => &label[..idx],
        None => label,
    }
}
