use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use colorweave::backends::memory::MemoryEnvironment;
use colorweave::backends::osc::OscTerminal;
use colorweave::backends::pywal::PywalFile;
use colorweave::backends::Environment;
use colorweave::cli::{Args, Backend, Command, KindArg};
use colorweave::pipeline::extract::{extract_palette, load_image};
use colorweave::pipeline::name::{generator_hints, ColorNamer};
use colorweave::pipeline::parse::{format_canonical, parse_palette_text};
use colorweave::theme::{Scheme, ThemeContext, VariantKind};
use colorweave::{preview, Color};

fn main() -> Result<()> {
    let args = Args::parse();
    colorweave::logging::init(args.verbose);

    match args.command {
        Command::Extract {
            image,
            colors,
            names,
            preview: show_preview,
        } => extract(&image, colors, names, show_preview),
        Command::Name { colors } => name(&colors),
        Command::Hints { image, colors } => hints(&image, colors),
        Command::Parse {
            input,
            preview: show_preview,
        } => parse(&input, show_preview),
        Command::Inspect { files, kind } => inspect(&files, kind),
        Command::Apply {
            files,
            scheme,
            variant,
            kind,
            backend,
            output,
        } => apply(&files, &scheme, variant.as_deref(), kind, backend, output),
    }
}

fn extract(image: &Path, k: usize, names: bool, show_preview: bool) -> Result<()> {
    let pixels = load_image(image)?;
    let palette = extract_palette(&pixels, k)
        .with_context(|| format!("failed to extract palette from {}", image.display()))?;
    info!(colors = palette.len(), "extracted palette");

    if names {
        let namer = ColorNamer::css()?;
        for (i, named) in namer.name_palette(&palette).iter().enumerate() {
            println!(
                "color{i}: \"{}\"  # {} (ΔE {:.1})",
                named.color, named.name, named.distance
            );
        }
    } else {
        print!("{}", palette.to_canonical_text());
    }

    if show_preview {
        let entries: Vec<(String, Color)> = palette
            .iter()
            .map(|c| (format!("{:.0}%", c.weight * 100.0), c.color))
            .collect();
        eprint!("{}", preview::render_swatches(&entries));
    }
    Ok(())
}

fn name(colors: &[String]) -> Result<()> {
    let namer = ColorNamer::css()?;
    for raw in colors {
        let color: Color = raw.parse()?;
        let named = namer.name(color);
        println!("{}  {}  ΔE {:.2}", named.color, named.name, named.distance);
    }
    Ok(())
}

fn hints(image: &Path, k: usize) -> Result<()> {
    let pixels = load_image(image)?;
    let palette = extract_palette(&pixels, k)?;
    let named = ColorNamer::css()?.name_palette(&palette);
    println!("{}", generator_hints(&named));
    Ok(())
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

fn parse(input: &Path, show_preview: bool) -> Result<()> {
    let text = read_input(input)?;
    let parsed = parse_palette_text(&text)
        .with_context(|| format!("no palette found in {}", input.display()))?;

    print!(
        "{}",
        format_canonical(parsed.pairs().iter().map(|(s, c)| (s, *c)))
    );
    for line in parsed.skipped() {
        info!(line = line.line_number, content = %line.content, "skipped");
    }
    eprintln!(
        "parsed {} slots, skipped {} lines",
        parsed.len(),
        parsed.skipped().len()
    );

    if show_preview {
        let entries: Vec<(String, Color)> = parsed
            .pairs()
            .iter()
            .map(|(s, c)| (s.to_string(), *c))
            .collect();
        eprint!("{}", preview::render_swatches(&entries));
    }
    Ok(())
}

/// One variant per file, named after the file stem.
fn load_scheme(scheme_name: &str, files: &[PathBuf], kind: KindArg) -> Result<Scheme> {
    let kind = match kind {
        KindArg::Dark => VariantKind::Dark,
        KindArg::Light => VariantKind::Light,
    };

    let mut scheme = Scheme::create(scheme_name);
    for file in files {
        let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
            bail!("cannot derive a variant name from {}", file.display());
        };
        let text = read_input(file)?;
        let variant = parse_palette_text(&text)
            .and_then(|parsed| parsed.into_variant(stem))
            .with_context(|| format!("invalid palette in {}", file.display()))?
            .with_kind(kind);
        scheme.add_variant(variant)?;
    }
    Ok(scheme)
}

fn hex_or_dash(color: Option<Color>) -> String {
    color.map_or_else(|| "-".to_string(), |c| c.to_hex())
}

fn inspect(files: &[PathBuf], kind: KindArg) -> Result<()> {
    let scheme = load_scheme("inspect", files, kind)?;
    for variant in scheme.variants_by_brightness() {
        let profile = variant.profile();
        println!(
            "{} ({}): background {} foreground {} accents {} {} contrast {}",
            variant.name(),
            variant.kind(),
            hex_or_dash(profile.background),
            hex_or_dash(profile.foreground),
            hex_or_dash(profile.accent1),
            hex_or_dash(profile.accent2),
            hex_or_dash(variant.most_contrasting()),
        );
    }
    Ok(())
}

fn apply(
    files: &[PathBuf],
    scheme_name: &str,
    selector: Option<&str>,
    kind: KindArg,
    backend: Backend,
    output: Option<PathBuf>,
) -> Result<()> {
    let scheme = load_scheme(scheme_name, files, kind)?;

    let variant_name = match selector {
        Some(selector) => scheme.select(selector)?.name().to_string(),
        None => scheme.default_variant()?.name().to_string(),
    };

    let environment: Box<dyn Environment> = match backend {
        Backend::Osc => Box::new(OscTerminal::new(std::io::stdout())),
        Backend::Pywal => {
            let path = match output {
                Some(path) => path,
                None => PywalFile::default_path()?,
            };
            Box::new(PywalFile::new(path))
        }
        Backend::DryRun => Box::new(MemoryEnvironment::new()),
    };
    let dry_run = backend == Backend::DryRun;

    let mut ctx = ThemeContext::new(environment);
    let variant = ctx.apply(&scheme, &variant_name)?;

    if dry_run {
        print!("{}", variant.to_canonical_text());
    }
    eprintln!(
        "Applied {} - {} ({}) via {}",
        scheme.name(),
        variant.name(),
        variant.kind(),
        ctx.environment().name()
    );
    Ok(())
}
