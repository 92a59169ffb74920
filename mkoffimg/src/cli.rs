//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::defaults::DEFAULT_OUTPUT;

/// Convert an image into a 400x240 monochrome display bitmap.
#[derive(Debug, Clone, Parser)]
#[command(name = "mkoffimg", version, about)]
pub struct Cli {
    /// Input image file (PNG, JPEG, WebP, GIF or BMP).
    #[arg(short = 'f', long = "input")]
    pub input: PathBuf,

    /// Output file; the extension selects bmp, png or jpeg encoding.
    #[arg(short = 'o', long = "output", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Dither to black and white before resampling [default: true].
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true")]
    pub dither: Option<bool>,

    /// Error multiplier for dithering, 0.0 to 4.0 [default: 1.18].
    #[arg(long)]
    pub contrast: Option<f32>,

    /// Diffusion kernel: floyd-steinberg or jarvis-judice-ninke.
    #[arg(long)]
    pub kernel: Option<String>,

    /// Crop reference points as x1:y1,x2:y2.
    #[arg(long)]
    pub crop: Option<String>,

    /// Log processing steps at debug level when RUST_LOG is unset.
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["mkoffimg"]).is_err());
    }

    #[test]
    fn test_bare_dither_flag_enables() {
        let cli = Cli::try_parse_from(["mkoffimg", "-f", "a.png", "--dither"]).unwrap();
        assert_eq!(cli.dither, Some(true));

        let cli = Cli::try_parse_from(["mkoffimg", "-f", "a.png", "--dither=false"]).unwrap();
        assert_eq!(cli.dither, Some(false));

        let cli = Cli::try_parse_from(["mkoffimg", "-f", "a.png"]).unwrap();
        assert_eq!(cli.dither, None);
    }

    #[test]
    fn test_long_and_short_paths() {
        let cli = Cli::try_parse_from(["mkoffimg", "--input", "a.png", "--output", "b.bmp", "-v"])
            .unwrap();
        assert_eq!(cli.input, PathBuf::from("a.png"));
        assert_eq!(cli.output, PathBuf::from("b.bmp"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_command_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
