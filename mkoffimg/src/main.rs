//! mkoffimg: convert an image into a 400x240 display image.

use clap::Parser;

use mkoffimg_lib::cli::Cli;
use mkoffimg_lib::config::AppConfig;
use mkoffimg_lib::{init_tracing, load_dotenv, pipeline};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    load_dotenv();

    let config = AppConfig::load(&cli)?;
    tracing::info!(
        input = %config.input.display(),
        output = %config.output.display(),
        format = ?config.format,
        dither = config.dither,
        kernel = config.kernel.name(),
        contrast = config.dither_settings.contrast,
        crop = ?config.crop,
        "Configuration loaded"
    );

    pipeline::run(&config)
}
