use std::fmt;

use palette::color_difference::Ciede2000;
use palette::Lab;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::pipeline::extract::Palette;

/// CSS Color Module Level 4 named colors, in specification order.
pub const CSS_COLORS: &[(&str, &str)] = &[
    ("aliceblue", "#f0f8ff"),
    ("antiquewhite", "#faebd7"),
    ("aqua", "#00ffff"),
    ("aquamarine", "#7fffd4"),
    ("azure", "#f0ffff"),
    ("beige", "#f5f5dc"),
    ("bisque", "#ffe4c4"),
    ("black", "#000000"),
    ("blanchedalmond", "#ffebcd"),
    ("blue", "#0000ff"),
    ("blueviolet", "#8a2be2"),
    ("brown", "#a52a2a"),
    ("burlywood", "#deb887"),
    ("cadetblue", "#5f9ea0"),
    ("chartreuse", "#7fff00"),
    ("chocolate", "#d2691e"),
    ("coral", "#ff7f50"),
    ("cornflowerblue", "#6495ed"),
    ("cornsilk", "#fff8dc"),
    ("crimson", "#dc143c"),
    ("cyan", "#00ffff"),
    ("darkblue", "#00008b"),
    ("darkcyan", "#008b8b"),
    ("darkgoldenrod", "#b8860b"),
    ("darkgray", "#a9a9a9"),
    ("darkgreen", "#006400"),
    ("darkgrey", "#a9a9a9"),
    ("darkkhaki", "#bdb76b"),
    ("darkmagenta", "#8b008b"),
    ("darkolivegreen", "#556b2f"),
    ("darkorange", "#ff8c00"),
    ("darkorchid", "#9932cc"),
    ("darkred", "#8b0000"),
    ("darksalmon", "#e9967a"),
    ("darkseagreen", "#8fbc8f"),
    ("darkslateblue", "#483d8b"),
    ("darkslategray", "#2f4f4f"),
    ("darkslategrey", "#2f4f4f"),
    ("darkturquoise", "#00ced1"),
    ("darkviolet", "#9400d3"),
    ("deeppink", "#ff1493"),
    ("deepskyblue", "#00bfff"),
    ("dimgray", "#696969"),
    ("dimgrey", "#696969"),
    ("dodgerblue", "#1e90ff"),
    ("firebrick", "#b22222"),
    ("floralwhite", "#fffaf0"),
    ("forestgreen", "#228b22"),
    ("fuchsia", "#ff00ff"),
    ("gainsboro", "#dcdcdc"),
    ("ghostwhite", "#f8f8ff"),
    ("gold", "#ffd700"),
    ("goldenrod", "#daa520"),
    ("gray", "#808080"),
    ("green", "#008000"),
    ("greenyellow", "#adff2f"),
    ("grey", "#808080"),
    ("honeydew", "#f0fff0"),
    ("hotpink", "#ff69b4"),
    ("indianred", "#cd5c5c"),
    ("indigo", "#4b0082"),
    ("ivory", "#fffff0"),
    ("khaki", "#f0e68c"),
    ("lavender", "#e6e6fa"),
    ("lavenderblush", "#fff0f5"),
    ("lawngreen", "#7cfc00"),
    ("lemonchiffon", "#fffacd"),
    ("lightblue", "#add8e6"),
    ("lightcoral", "#f08080"),
    ("lightcyan", "#e0ffff"),
    ("lightgoldenrodyellow", "#fafad2"),
    ("lightgray", "#d3d3d3"),
    ("lightgreen", "#90ee90"),
    ("lightgrey", "#d3d3d3"),
    ("lightpink", "#ffb6c1"),
    ("lightsalmon", "#ffa07a"),
    ("lightseagreen", "#20b2aa"),
    ("lightskyblue", "#87cefa"),
    ("lightslategray", "#778899"),
    ("lightslategrey", "#778899"),
    ("lightsteelblue", "#b0c4de"),
    ("lightyellow", "#ffffe0"),
    ("lime", "#00ff00"),
    ("limegreen", "#32cd32"),
    ("linen", "#faf0e6"),
    ("magenta", "#ff00ff"),
    ("maroon", "#800000"),
    ("mediumaquamarine", "#66cdaa"),
    ("mediumblue", "#0000cd"),
    ("mediumorchid", "#ba55d3"),
    ("mediumpurple", "#9370db"),
    ("mediumseagreen", "#3cb371"),
    ("mediumslateblue", "#7b68ee"),
    ("mediumspringgreen", "#00fa9a"),
    ("mediumturquoise", "#48d1cc"),
    ("mediumvioletred", "#c71585"),
    ("midnightblue", "#191970"),
    ("mintcream", "#f5fffa"),
    ("mistyrose", "#ffe4e1"),
    ("moccasin", "#ffe4b5"),
    ("navajowhite", "#ffdead"),
    ("navy", "#000080"),
    ("oldlace", "#fdf5e6"),
    ("olive", "#808000"),
    ("olivedrab", "#6b8e23"),
    ("orange", "#ffa500"),
    ("orangered", "#ff4500"),
    ("orchid", "#da70d6"),
    ("palegoldenrod", "#eee8aa"),
    ("palegreen", "#98fb98"),
    ("paleturquoise", "#afeeee"),
    ("palevioletred", "#db7093"),
    ("papayawhip", "#ffefd5"),
    ("peachpuff", "#ffdab9"),
    ("peru", "#cd853f"),
    ("pink", "#ffc0cb"),
    ("plum", "#dda0dd"),
    ("powderblue", "#b0e0e6"),
    ("purple", "#800080"),
    ("rebeccapurple", "#663399"),
    ("red", "#ff0000"),
    ("rosybrown", "#bc8f8f"),
    ("royalblue", "#4169e1"),
    ("saddlebrown", "#8b4513"),
    ("salmon", "#fa8072"),
    ("sandybrown", "#f4a460"),
    ("seagreen", "#2e8b57"),
    ("seashell", "#fff5ee"),
    ("sienna", "#a0522d"),
    ("silver", "#c0c0c0"),
    ("skyblue", "#87ceeb"),
    ("slateblue", "#6a5acd"),
    ("slategray", "#708090"),
    ("slategrey", "#708090"),
    ("snow", "#fffafa"),
    ("springgreen", "#00ff7f"),
    ("steelblue", "#4682b4"),
    ("tan", "#d2b48c"),
    ("teal", "#008080"),
    ("thistle", "#d8bfd8"),
    ("tomato", "#ff6347"),
    ("turquoise", "#40e0d0"),
    ("violet", "#ee82ee"),
    ("wheat", "#f5deb3"),
    ("white", "#ffffff"),
    ("whitesmoke", "#f5f5f5"),
    ("yellow", "#ffff00"),
    ("yellowgreen", "#9acd32"),
];

/// A color annotated with the nearest reference name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedColor {
    pub color: Color,
    pub name: String,
    /// CIEDE2000 distance to the reference swatch.
    pub distance: f32,
}

impl fmt::Display for NamedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.color, self.name)
    }
}

#[derive(Debug, Clone)]
struct Reference {
    name: String,
    lab: Lab,
}

/// Nearest-name lookup over a fixed reference table.
#[derive(Debug, Clone)]
pub struct ColorNamer {
    table: Vec<Reference>,
}

impl ColorNamer {
    /// Namer over the built-in CSS color table.
    pub fn css() -> Result<Self> {
        Self::with_table(CSS_COLORS)
    }

    /// Namer over a caller-supplied `(name, hex)` table.
    pub fn with_table(entries: &[(&str, &str)]) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::InvalidArgument(
                "color name table is empty".to_string(),
            ));
        }
        let table = entries
            .iter()
            .map(|&(name, hex)| {
                Ok(Reference {
                    name: name.to_string(),
                    lab: Color::from_hex(hex)?.to_lab(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { table })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Nearest reference name by CIEDE2000. Ties go to the earliest entry.
    pub fn name(&self, color: Color) -> NamedColor {
        let lab = color.to_lab();
        // with_table guarantees at least one entry
        let mut best = &self.table[0];
        let mut best_distance = lab.difference(best.lab);
        for reference in &self.table[1..] {
            let distance = lab.difference(reference.lab);
            if distance < best_distance {
                best = reference;
                best_distance = distance;
            }
        }
        NamedColor {
            color,
            name: best.name.clone(),
            distance: best_distance,
        }
    }

    pub fn name_all(&self, colors: &[Color]) -> Vec<NamedColor> {
        colors.iter().map(|&c| self.name(c)).collect()
    }

    /// Name every palette entry, preserving palette order.
    pub fn name_palette(&self, palette: &Palette) -> Vec<NamedColor> {
        palette.iter().map(|c| self.name(c.color)).collect()
    }
}

/// Render `[('#hex', 'name'), ...]`, the listing handed to a palette
/// generator as a hint.
pub fn generator_hints(named: &[NamedColor]) -> String {
    let items: Vec<String> = named
        .iter()
        .map(|n| format!("('{}', '{}')", n.color, n.name))
        .collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extract::{extract_palette, PixelBuffer};

    #[test]
    fn css_table_is_well_formed() {
        for (name, hex) in CSS_COLORS {
            assert!(Color::from_hex(hex).is_ok(), "bad hex for {name}: {hex}");
        }
        assert_eq!(ColorNamer::css().unwrap().len(), CSS_COLORS.len());
    }

    #[test]
    fn exact_swatch_has_zero_distance() {
        let namer = ColorNamer::css().unwrap();
        let named = namer.name(Color::from_hex("#4682b4").unwrap());
        assert_eq!(named.name, "steelblue");
        assert!(named.distance < 1e-3);
    }

    #[test]
    fn duplicate_swatches_resolve_to_first_entry() {
        let namer = ColorNamer::css().unwrap();
        assert_eq!(namer.name(Color::new(0, 255, 255)).name, "aqua");
        assert_eq!(namer.name(Color::new(0x80, 0x80, 0x80)).name, "gray");
    }

    #[test]
    fn nearby_color_gets_perceptual_neighbor() {
        let namer = ColorNamer::css().unwrap();
        assert_eq!(namer.name(Color::new(250, 5, 5)).name, "red");
        assert_eq!(namer.name(Color::new(0x2c, 0x4b, 0x4e)).name, "darkslategray");
    }

    #[test]
    fn naming_is_deterministic() {
        let namer = ColorNamer::css().unwrap();
        let color = Color::new(123, 45, 67);
        assert_eq!(namer.name(color), namer.name(color));
    }

    #[test]
    fn custom_table_rejects_bad_hex() {
        let err = ColorNamer::with_table(&[("ok", "#000000"), ("bad", "#12")]).unwrap_err();
        assert!(matches!(err, Error::InvalidColor { .. }));
        assert!(matches!(
            ColorNamer::with_table(&[]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn custom_table_ties_pick_lowest_index() {
        let namer =
            ColorNamer::with_table(&[("first", "#808080"), ("second", "#808080")]).unwrap();
        assert_eq!(namer.name(Color::new(0x70, 0x70, 0x70)).name, "first");
    }

    #[test]
    fn palette_names_follow_palette_order() {
        let pixels =
            PixelBuffer::from_rgb_pixels(&[[255, 0, 0], [255, 0, 0], [0, 0, 255]]).unwrap();
        let palette = extract_palette(&pixels, 4).unwrap();
        let names: Vec<String> = ColorNamer::css()
            .unwrap()
            .name_palette(&palette)
            .into_iter()
            .map(|n| n.name)
            .collect();
        assert_eq!(names, ["red", "blue"]);
    }

    #[test]
    fn hints_list_hex_and_name() {
        let namer = ColorNamer::css().unwrap();
        let named = namer.name_all(&[Color::new(0, 0, 0), Color::new(255, 255, 255)]);
        assert_eq!(
            generator_hints(&named),
            "[('#000000', 'black'), ('#ffffff', 'white')]"
        );
        assert_eq!(named[0].to_string(), "#000000 (black)");
    }
}
