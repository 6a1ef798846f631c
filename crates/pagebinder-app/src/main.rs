// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagebinder — bind an ordered set of images into a single multi-page PDF
//
// Entry point. Initialises logging, loads settings, reads the images and
// hands them to the generation pipeline.

mod services;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use pagebinder_core::error::{PagebinderError, Result};
use pagebinder_core::human_errors::{Severity, humanize_error};
use pagebinder_core::{FitMode, GeneratedDocument, Orientation, PageSize, format_file_size};
use pagebinder_document::{PdfAssembler, PdfReader, Pipeline};
use tracing::{error, info};

use services::config_dir::load_config;
use services::intake::collect_images;
use services::options::Overrides;

#[derive(Debug, Parser)]
#[command(name = "pagebinder")]
#[command(version)]
#[command(about = "Bind images into a single multi-page PDF", long_about = None)]
struct Cli {
    /// Images to bind, in page order (JPG, PNG, GIF, WEBP)
    #[arg(value_name = "IMAGE", required = true)]
    images: Vec<PathBuf>,

    /// Output file or directory (defaults to the current directory)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Page size: A4, Letter or Legal
    #[arg(short = 's', long, value_name = "SIZE")]
    page_size: Option<PageSize>,

    /// Page orientation: portrait or landscape
    #[arg(long)]
    orientation: Option<Orientation>,

    /// Margin on every side, in millimetres
    #[arg(short, long, value_name = "MM")]
    margin: Option<f64>,

    /// How images are sized: fit, fill or original
    #[arg(short, long, value_name = "MODE")]
    fit: Option<FitMode>,

    /// Output file name (".pdf" is appended when missing)
    #[arg(short, long)]
    name: Option<String>,

    /// Do not stamp "Page n of N" on each page
    #[arg(long)]
    no_page_numbers: bool,

    /// TrueType font for page numbers
    #[arg(long, value_name = "FILE", env = "PAGEBINDER_FONT")]
    font: Option<PathBuf>,

    /// JPEG quality for rendered pages (1-100)
    #[arg(short, long, value_name = "N")]
    quality: Option<u8>,

    /// Document title stored in the PDF
    #[arg(short, long)]
    title: Option<String>,

    /// Settings file (defaults to the user config directory)
    #[arg(short, long, value_name = "FILE", env = "PAGEBINDER_CONFIG")]
    config: Option<PathBuf>,

    /// Re-open the written PDF and check its page count
    #[arg(long)]
    verify: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            page_size: self.page_size,
            orientation: self.orientation,
            margin_mm: self.margin,
            fit_mode: self.fit,
            file_name: self.name.clone(),
            no_page_numbers: self.no_page_numbers,
            caption_font: self.font.clone(),
            jpeg_quality: self.quality,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Pagebinder failed");
            let human = humanize_error(&err);
            eprintln!("{}\n{}", human.message, human.suggestion);
            match human.severity {
                Severity::ActionRequired => ExitCode::from(2),
                Severity::Permanent | Severity::Internal => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    let options = cli.overrides().apply(&mut config);

    let images = collect_images(&cli.images)?;
    info!(count = images.len(), "Images ready");

    let mut pipeline = Pipeline::from_config(&config)?;
    if let Some(title) = &cli.title {
        pipeline = pipeline.with_assembler(PdfAssembler::with_title(title.as_str()));
    }
    let document = pipeline.generate(images.as_slice(), &options)?;

    let path = output_path(cli.output.as_deref(), &document.file_name);
    std::fs::write(&path, &document.bytes)?;
    println!(
        "Wrote {} ({} pages, {})",
        path.display(),
        document.page_count,
        format_file_size(document.bytes.len() as u64)
    );

    if cli.verify {
        verify(&path, &document)?;
        println!("Verified {} pages", document.page_count);
    }
    Ok(())
}

/// Where to write the document: an existing directory receives the suggested
/// file name, any other path is used as given.
fn output_path(output: Option<&Path>, file_name: &str) -> PathBuf {
    match output {
        Some(dir) if dir.is_dir() => dir.join(file_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}

fn verify(path: &Path, document: &GeneratedDocument) -> Result<()> {
    let reader = PdfReader::open(path)?;
    let found = reader.page_count();
    if found != document.page_count {
        return Err(PagebinderError::PdfRead(format!(
            "{} has {} pages, expected {}",
            path.display(),
            found,
            document.page_count
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_parse_into_overrides() {
        let cli = Cli::try_parse_from([
            "pagebinder",
            "-s",
            "letter",
            "--orientation",
            "landscape",
            "-m",
            "12.5",
            "-f",
            "original",
            "--no-page-numbers",
            "a.png",
            "b.jpg",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(cli.images, [PathBuf::from("a.png"), PathBuf::from("b.jpg")]);
        assert_eq!(overrides.page_size, Some(PageSize::Letter));
        assert_eq!(overrides.orientation, Some(Orientation::Landscape));
        assert_eq!(overrides.margin_mm, Some(12.5));
        assert_eq!(overrides.fit_mode, Some(FitMode::Original));
        assert!(overrides.no_page_numbers);
    }

    #[test]
    fn unknown_page_size_is_rejected() {
        assert!(Cli::try_parse_from(["pagebinder", "-s", "A3", "a.png"]).is_err());
    }

    #[test]
    fn at_least_one_image_is_required() {
        assert!(Cli::try_parse_from(["pagebinder"]).is_err());
    }

    #[test]
    fn output_directory_receives_suggested_name() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            output_path(Some(dir.path()), "scan.pdf"),
            dir.path().join("scan.pdf")
        );
        assert_eq!(
            output_path(Some(Path::new("out/book.pdf")), "scan.pdf"),
            PathBuf::from("out/book.pdf")
        );
        assert_eq!(output_path(None, "scan.pdf"), PathBuf::from("scan.pdf"));
    }

    #[test]
    fn end_to_end_writes_and_verifies() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("dot.png");
        image::RgbImage::from_pixel(4, 3, image::Rgb([200, 0, 0]))
            .save(&photo)
            .unwrap();
        let settings = dir.path().join("settings.json");
        std::fs::write(&settings, "{}").unwrap();
        let out = dir.path().join("out.pdf");

        let args: Vec<OsString> = vec![
            "pagebinder".into(),
            "--no-page-numbers".into(),
            "--verify".into(),
            "-c".into(),
            settings.into_os_string(),
            "-o".into(),
            out.clone().into_os_string(),
            photo.into_os_string(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        run(&cli).unwrap();

        let reader = PdfReader::open(&out).unwrap();
        assert_eq!(reader.page_count(), 1);
    }
}
