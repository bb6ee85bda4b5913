use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Extract palettes from images, name colors, and apply color schemes.
#[derive(Parser, Debug)]
#[command(name = "colorweave", version, about)]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the dominant colors of an image in canonical palette format
    Extract {
        /// Path to the input image
        image: PathBuf,

        /// Number of K-means clusters
        #[arg(short = 'k', long = "colors", default_value_t = 6)]
        colors: usize,

        /// Annotate each color with its nearest CSS name
        #[arg(long)]
        names: bool,

        /// Print a colored terminal preview of the palette
        #[arg(long)]
        preview: bool,
    },

    /// Print the nearest CSS color name for each hex color
    Name {
        /// Colors as `#rrggbb` or `rrggbb`
        #[arg(required = true)]
        colors: Vec<String>,
    },

    /// Print the named-color hint list for an image
    Hints {
        /// Path to the input image
        image: PathBuf,

        /// Number of K-means clusters
        #[arg(short = 'k', long = "colors", default_value_t = 6)]
        colors: usize,
    },

    /// Recover slot/color lines from generated text
    Parse {
        /// Text file to read, or `-` for stdin
        input: PathBuf,

        /// Print a colored terminal preview of the parsed colors
        #[arg(long)]
        preview: bool,
    },

    /// Summarize palette files as variants, darkest background first
    Inspect {
        /// Palette text files, one variant each, named after the file stem
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Kind recorded for every variant loaded from the files
        #[arg(long, value_enum, default_value_t = KindArg::Dark)]
        kind: KindArg,
    },

    /// Build a scheme from palette files and apply one variant
    Apply {
        /// Palette text files, one variant each, named after the file stem
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Scheme name
        #[arg(short, long)]
        scheme: String,

        /// Variant name, or `dark`/`light` (defaults to the first file)
        #[arg(long)]
        variant: Option<String>,

        /// Kind recorded for every variant loaded from the files
        #[arg(long, value_enum, default_value_t = KindArg::Dark)]
        kind: KindArg,

        /// Where to apply the colors
        #[arg(short, long, value_enum, default_value_t = Backend::Osc)]
        backend: Backend,

        /// Output path for the pywal backend
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Escape sequences to the current terminal
    Osc,
    /// Pywal-style colors.json
    Pywal,
    /// Print what would be written
    DryRun,
}
