use std::collections::HashMap;
use std::path::Path;

use image::imageops::FilterType;
use kmeans_colors::get_kmeans_hamerly;
use palette::Lab;
use tracing::debug;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::pipeline::parse::format_canonical;

const MAX_DIM: u32 = 256;

/// Largest supported cluster count (cluster indices are stored as `u8`).
pub const MAX_CLUSTERS: usize = 256;

/// A decoded RGB8 pixel buffer, row-major, three samples per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGB samples. The sample count must be exactly
    /// `width * height * 3` and the buffer must hold at least one pixel.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if expected == 0 {
            return Err(Error::Decode(format!(
                "empty pixel buffer ({width}x{height})"
            )));
        }
        if data.len() != expected {
            return Err(Error::Decode(format!(
                "expected {expected} samples for {width}x{height} RGB, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a single-row buffer from a list of RGB triplets.
    pub fn from_rgb_pixels(pixels: &[[u8; 3]]) -> Result<Self> {
        let width = u32::try_from(pixels.len())
            .map_err(|_| Error::Decode(format!("too many pixels: {}", pixels.len())))?;
        Self::from_raw(width, 1, pixels.concat())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / 3
    }

    pub fn pixels(&self) -> impl Iterator<Item = Color> + '_ {
        self.data
            .chunks_exact(3)
            .map(|p| Color::new(p[0], p[1], p[2]))
    }
}

/// Load an image and resize it to fit within 256x256 (preserving aspect
/// ratio).
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    let img = image::open(path).map_err(|e| {
        if !path.exists() {
            Error::Decode(format!("file not found: {}", path.display()))
        } else {
            Error::Decode(format!(
                "unsupported or corrupt image: {} ({e})",
                path.display()
            ))
        }
    })?;

    let img = if img.width() > MAX_DIM || img.height() > MAX_DIM {
        img.resize(MAX_DIM, MAX_DIM, FilterType::Lanczos3)
    } else {
        img
    };
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    debug!(path = %path.display(), width, height, "decoded image");
    PixelBuffer::from_raw(width, height, rgb.into_raw())
}

/// Tunables for the clustering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    pub max_iterations: usize,
    /// Hamerly convergence threshold.
    pub convergence: f32,
    pub seed: u64,
    /// Centroids closer than this CIE76 ΔE are merged.
    pub merge_threshold: f32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            convergence: 5.0,
            seed: 42,
            merge_threshold: 5.0,
        }
    }
}

/// A color extracted from the image with its cluster weight.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedColor {
    pub color: Color,
    /// Fraction of source pixels assigned to this color.
    pub weight: f64,
}

/// Dominant colors ordered by descending weight, ties by ascending hex.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Palette {
    colors: Vec<ExtractedColor>,
}

impl Palette {
    pub fn iter(&self) -> std::slice::Iter<'_, ExtractedColor> {
        self.colors.iter()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> Vec<Color> {
        self.colors.iter().map(|c| c.color).collect()
    }

    pub fn total_weight(&self) -> f64 {
        self.colors.iter().map(|c| c.weight).sum()
    }

    /// Canonical text form with slots `color0`, `color1`, ...
    pub fn to_canonical_text(&self) -> String {
        let pairs: Vec<(String, Color)> = self
            .colors
            .iter()
            .enumerate()
            .map(|(i, c)| (format!("color{i}"), c.color))
            .collect();
        format_canonical(pairs.iter().map(|(slot, color)| (slot.as_str(), *color)))
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a ExtractedColor;
    type IntoIter = std::slice::Iter<'a, ExtractedColor>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.iter()
    }
}

/// Extract at most `k` dominant colors with default options.
pub fn extract_palette(pixels: &PixelBuffer, k: usize) -> Result<Palette> {
    extract_palette_with(pixels, k, &ExtractOptions::default())
}

/// Extract at most `k` dominant colors.
///
/// Sources with no more than `k` distinct colors are returned exactly, one
/// entry per color. Otherwise K-means (Hamerly, seeded K-means++) runs in
/// CIELAB and near-identical centroids are merged.
pub fn extract_palette_with(
    pixels: &PixelBuffer,
    k: usize,
    options: &ExtractOptions,
) -> Result<Palette> {
    if k == 0 || k > MAX_CLUSTERS {
        return Err(Error::InvalidArgument(format!(
            "cluster count must be in 1..={MAX_CLUSTERS}, got {k}"
        )));
    }

    let mut distinct: HashMap<Color, usize> = HashMap::new();
    for color in pixels.pixels() {
        *distinct.entry(color).or_default() += 1;
    }

    let counts: Vec<(Color, usize)> = if distinct.len() <= k {
        debug!(distinct = distinct.len(), k, "source has few colors, skipping clustering");
        distinct.into_iter().collect()
    } else {
        cluster(pixels, k, options)
    };

    let total = pixels.pixel_count() as f64;
    let mut colors: Vec<ExtractedColor> = counts
        .into_iter()
        .map(|(color, count)| ExtractedColor {
            color,
            weight: count as f64 / total,
        })
        .collect();

    colors.sort_by(|a, b| {
        b.weight
            .total_cmp(&a.weight)
            .then_with(|| a.color.cmp(&b.color))
    });

    debug!(requested = k, extracted = colors.len(), "extracted palette");
    Ok(Palette { colors })
}

/// Run K-means on the LAB pixels and return non-empty clusters with their
/// pixel counts.
fn cluster(pixels: &PixelBuffer, k: usize, options: &ExtractOptions) -> Vec<(Color, usize)> {
    let lab: Vec<Lab> = pixels.pixels().map(Color::to_lab).collect();
    let result = get_kmeans_hamerly(
        k,
        options.max_iterations,
        options.convergence,
        false,
        &lab,
        options.seed,
    );

    let mut counts = vec![0usize; result.centroids.len()];
    for &idx in &result.indices {
        counts[idx as usize] += 1;
    }

    let mut clusters: Vec<(Color, usize)> = result
        .centroids
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(lab, count)| (Color::from_lab(*lab), count))
        .collect();

    deduplicate(&mut clusters, options.merge_threshold);
    clusters
}

/// Merge clusters that round to the same color or sit within `threshold` ΔE.
/// Keeps the first color and accumulates the count.
fn deduplicate(clusters: &mut Vec<(Color, usize)>, threshold: f32) {
    let threshold_sq = threshold * threshold;
    let mut i = 0;
    while i < clusters.len() {
        let mut j = i + 1;
        while j < clusters.len() {
            let lab_i = clusters[i].0.to_lab();
            let lab_j = clusters[j].0.to_lab();
            let delta_e_sq = (lab_i.l - lab_j.l).powi(2)
                + (lab_i.a - lab_j.a).powi(2)
                + (lab_i.b - lab_j.b).powi(2);
            if clusters[i].0 == clusters[j].0 || delta_e_sq < threshold_sq {
                clusters[i].1 += clusters[j].1;
                clusters.remove(j);
            } else {
                j += 1;
            }
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> PixelBuffer {
        let data = rgb.repeat((width * height) as usize);
        PixelBuffer::from_raw(width, height, data).unwrap()
    }

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.extend([
                    ((x * 255) / width.max(1)) as u8,
                    ((y * 255) / height.max(1)) as u8,
                    128,
                ]);
            }
        }
        PixelBuffer::from_raw(width, height, data).unwrap()
    }

    // --- PixelBuffer / load_image ---

    #[test]
    fn raw_buffer_length_is_checked() {
        let err = PixelBuffer::from_raw(2, 2, vec![0; 11]).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn empty_buffer_is_rejected() {
        assert!(matches!(
            PixelBuffer::from_raw(0, 4, Vec::new()),
            Err(Error::Decode(_))
        ));
        assert!(PixelBuffer::from_rgb_pixels(&[]).is_err());
    }

    #[test]
    fn load_small_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("4x4.png");
        image::RgbImage::from_fn(4, 4, |_, _| image::Rgb([128, 128, 128]))
            .save(&path)
            .unwrap();

        let pixels = load_image(&path).unwrap();
        assert_eq!(pixels.pixel_count(), 16);
    }

    #[test]
    fn load_nonsquare_preserves_aspect_ratio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("512x256.png");
        image::RgbImage::from_fn(512, 256, |_, _| image::Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let pixels = load_image(&path).unwrap();
        assert_eq!((pixels.width(), pixels.height()), (256, 128));
    }

    #[test]
    fn load_file_not_found() {
        let err = load_image(Path::new("/nonexistent/image.png"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("file not found"), "got: {err}");
    }

    #[test]
    fn load_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_an_image.png");
        std::fs::write(&path, "this is not an image").unwrap();

        let err = load_image(&path).unwrap_err();
        assert!(matches!(err, Error::Decode(ref m) if m.contains("unsupported")));
    }

    // --- extract_palette ---

    #[test]
    fn zero_clusters_is_invalid() {
        let pixels = solid(2, 2, [1, 2, 3]);
        assert!(matches!(
            extract_palette(&pixels, 0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            extract_palette(&pixels, MAX_CLUSTERS + 1),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn monochrome_source_yields_single_color() {
        let pixels = solid(16, 16, [0x2c, 0x4b, 0x4e]);
        let palette = extract_palette(&pixels, 6).unwrap();
        assert_eq!(palette.len(), 1);
        let only = palette.iter().next().unwrap();
        assert_eq!(only.color.to_hex(), "#2c4b4e");
        assert_eq!(only.weight, 1.0);
    }

    #[test]
    fn few_distinct_colors_are_returned_exactly() {
        let mut rgb = vec![[200, 50, 50]; 6];
        rgb.extend(vec![[50, 50, 200]; 3]);
        rgb.extend(vec![[201, 50, 50]; 1]);
        let pixels = PixelBuffer::from_rgb_pixels(&rgb).unwrap();

        let palette = extract_palette(&pixels, 8).unwrap();
        let hexes: Vec<String> = palette.colors().iter().map(|c| c.to_hex()).collect();
        assert_eq!(hexes, ["#c83232", "#3232c8", "#c93232"]);
        let weights: Vec<f64> = palette.iter().map(|c| c.weight).collect();
        assert_eq!(weights, [0.6, 0.3, 0.1]);
    }

    #[test]
    fn equal_weights_break_ties_by_hex() {
        let rgb = [[0xff, 0, 0], [0, 0, 0xff], [0, 0xff, 0], [0, 0, 0]];
        let pixels = PixelBuffer::from_rgb_pixels(&rgb).unwrap();
        let palette = extract_palette(&pixels, 4).unwrap();
        let hexes: Vec<String> = palette.colors().iter().map(|c| c.to_hex()).collect();
        assert_eq!(hexes, ["#000000", "#0000ff", "#00ff00", "#ff0000"]);
    }

    #[test]
    fn clustering_respects_k_and_weights_sum_to_one() {
        let pixels = gradient(32, 32);
        let palette = extract_palette(&pixels, 6).unwrap();
        assert!(!palette.is_empty());
        assert!(palette.len() <= 6);
        assert!((palette.total_weight() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn clustering_is_deterministic() {
        let pixels = gradient(40, 24);
        let first = extract_palette(&pixels, 5).unwrap();
        let second = extract_palette(&pixels, 5).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn iteration_cap_and_tight_convergence_still_terminate() {
        let pixels = gradient(48, 32);
        for options in [
            ExtractOptions {
                max_iterations: 1,
                ..ExtractOptions::default()
            },
            ExtractOptions {
                max_iterations: 200,
                convergence: 1e-6,
                ..ExtractOptions::default()
            },
        ] {
            let first = extract_palette_with(&pixels, 6, &options).unwrap();
            assert!(!first.is_empty());
            assert!(first.len() <= 6);
            assert!((first.total_weight() - 1.0).abs() < 1e-6);
            assert_eq!(first, extract_palette_with(&pixels, 6, &options).unwrap());
        }
    }

    #[test]
    fn results_sorted_by_weight_descending() {
        let mut rgb = vec![[200, 50, 50]; 600];
        rgb.extend(vec![[50, 50, 200]; 300]);
        rgb.extend(vec![[50, 200, 50]; 100]);
        for i in 0..20u8 {
            rgb.push([i * 10, 255 - i * 10, 128]);
        }
        let pixels = PixelBuffer::from_rgb_pixels(&rgb).unwrap();

        let palette = extract_palette(&pixels, 4).unwrap();
        let colors: Vec<&ExtractedColor> = palette.iter().collect();
        for window in colors.windows(2) {
            assert!(
                window[0].weight >= window[1].weight,
                "colors not sorted by weight: {} < {}",
                window[0].weight,
                window[1].weight
            );
        }
    }

    #[test]
    fn deduplication_merges_similar_colors() {
        let mut clusters = vec![
            (Color::new(100, 100, 100), 5),
            (Color::new(101, 100, 100), 3),
            (Color::new(10, 200, 30), 2),
        ];
        deduplicate(&mut clusters, 5.0);
        assert_eq!(
            clusters,
            vec![(Color::new(100, 100, 100), 8), (Color::new(10, 200, 30), 2)]
        );
    }

    #[test]
    fn canonical_text_uses_indexed_slots() {
        let pixels = PixelBuffer::from_rgb_pixels(&[[255, 0, 0], [255, 0, 0], [0, 0, 0]]).unwrap();
        let palette = extract_palette(&pixels, 2).unwrap();
        assert_eq!(
            palette.to_canonical_text(),
            "color0: \"#ff0000\"\ncolor1: \"#000000\"\n"
        );
    }
}
