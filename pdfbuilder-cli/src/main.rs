//! pdfbuilder - Join, split, rotate and overlay PDF files.

mod cli;

use clap::Parser;
use lopdf::Document;
use std::path::{Path, PathBuf};
use std::process;

use crate::cli::Cli;
use pdfbuilder::assemble::{
    DocumentAssembler, overlay_pages, split_output_paths, split_pages, transform_pages,
};
use pdfbuilder::config::{Config, JoinInput, Operation, OverwriteMode};
use pdfbuilder::error::PdfBuilderError;
use pdfbuilder::filelist::OrderedFileList;
use pdfbuilder::io::{PdfWriter, load_pdf};
use pdfbuilder::output::{OutputFormatter, display_file_list, display_write_statistics};
use pdfbuilder::selection::{self, PageWindow};
use pdfbuilder::settings::Session;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// `RUST_LOG` overrides the level picked from the flags.
fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else if cli.quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_secs()
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PdfBuilderError> {
    let mut session = Session::load(cli.session_dir()).await;

    let Some(config) = cli.to_config(&session).await? else {
        println!("{}", session.to_json()?);
        return Ok(());
    };

    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", pdfbuilder::NAME, pdfbuilder::VERSION));
        formatter.blank_line();
    }

    let writer = PdfWriter::with_options(config.compression.into());
    log::debug!("running {} with {:?}", config.operation.name(), config.compression);

    let written = match &config.operation {
        Operation::Join { inputs, output } => {
            run_join(&config, inputs, output, &writer, &formatter).await?
        }
        Operation::Split { input, output_dir } => {
            run_split(&config, input, output_dir, &writer, &formatter).await?
        }
        Operation::Rotate {
            input,
            output,
            window,
            rotation,
            drop_outside,
        } => {
            let mut doc = load_pdf(input).await?;
            let page_count = doc.get_pages().len();
            let window = window.unwrap_or_else(|| PageWindow::all(page_count));
            window.check_bounds(page_count, input)?;

            if config.dry_run {
                let range = window.as_range();
                formatter.info(&format!(
                    "Pages {}-{} of {} would be rotated by {} degrees",
                    range.start + 1,
                    range.end,
                    page_count,
                    rotation.as_degrees()
                ));
                if *drop_outside {
                    formatter.info("Pages outside that range would be dropped");
                }
                report_dry_run(&formatter, std::slice::from_ref(output));
                return Ok(());
            }

            handle_output_overwrite(&writer, output, config.overwrite_mode, &formatter).await?;

            let kept = transform_pages(&mut doc, input, window, *rotation, *drop_outside)?;
            formatter.debug(&format!("{kept} page(s) in output"));
            vec![write_document(&writer, &formatter, &doc, output).await?]
        }
        Operation::Overlay {
            input,
            overlay,
            output,
            placement,
        } => {
            let mut doc = load_pdf(input).await?;
            let stamp = load_pdf(overlay).await?;

            if config.dry_run {
                formatter.info(&format!(
                    "{} page(s) of {} would be drawn onto {} page(s) as {:?}",
                    stamp.get_pages().len(),
                    overlay.display(),
                    doc.get_pages().len(),
                    placement
                ));
                report_dry_run(&formatter, std::slice::from_ref(output));
                return Ok(());
            }

            handle_output_overwrite(&writer, output, config.overwrite_mode, &formatter).await?;

            let pages = overlay_pages(&mut doc, &stamp, *placement)?;
            formatter.debug(&format!("overlay drawn on {pages} page(s)"));
            vec![write_document(&writer, &formatter, &doc, output).await?]
        }
    };

    if let Some(last) = written.last() {
        session.record_export(last, written.len() as u64);
        if let Err(e) = session.save().await {
            log::warn!("{e}");
            formatter.warning(&format!(
                "Could not save settings to {}; continuing",
                session.dir().display()
            ));
        }
    }

    Ok(())
}

/// Join `inputs` into `output`. Returns the written files.
async fn run_join(
    config: &Config,
    inputs: &[JoinInput],
    output: &Path,
    writer: &PdfWriter,
    formatter: &OutputFormatter,
) -> Result<Vec<PathBuf>, PdfBuilderError> {
    formatter.info("Reading input files...");

    let mut list = OrderedFileList::new();
    for input in inputs {
        let id = list.add(&input.path).await?.id;
        list.set_page_selection(id, input.pages.as_str())?;
    }

    let entries = list.snapshot();
    display_file_list(formatter, &entries);

    if config.dry_run {
        let mut total = 0;
        for entry in &entries {
            total += selection::parse(&entry.page_selection)?
                .resolve(entry.page_count, &entry.path)?
                .len();
        }
        formatter.blank_line();
        formatter.info(&format!("{total} page(s) would be joined"));
        report_dry_run(formatter, &[output.to_path_buf()]);
        return Ok(Vec::new());
    }

    handle_output_overwrite(writer, output, config.overwrite_mode, formatter).await?;

    formatter.info("Joining documents...");
    let joined = DocumentAssembler::new().assemble(&entries).await?;

    Ok(vec![write_document(writer, formatter, &joined, output).await?])
}

/// Split `input` into `output_dir`. Returns the written files.
async fn run_split(
    config: &Config,
    input: &Path,
    output_dir: &Path,
    writer: &PdfWriter,
    formatter: &OutputFormatter,
) -> Result<Vec<PathBuf>, PdfBuilderError> {
    let doc = load_pdf(input).await?;
    let paths = split_output_paths(input, output_dir, doc.get_pages().len());

    if config.dry_run {
        report_dry_run(formatter, &paths);
        return Ok(Vec::new());
    }

    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|source| PdfBuilderError::FailedToCreateOutput {
            path: output_dir.to_path_buf(),
            source,
        })?;

    // Settle every overwrite question before the first page is written.
    for path in &paths {
        handle_output_overwrite(writer, path, config.overwrite_mode, formatter).await?;
    }

    formatter.info(&format!("Splitting {} page(s)...", paths.len()));
    let pages = split_pages(&doc)?;

    let mut written = Vec::with_capacity(paths.len());
    for (page, path) in pages.iter().zip(&paths) {
        written.push(write_document(writer, formatter, page, path).await?);
    }

    Ok(written)
}

async fn write_document(
    writer: &PdfWriter,
    formatter: &OutputFormatter,
    doc: &Document,
    path: &Path,
) -> Result<PathBuf, PdfBuilderError> {
    formatter.debug(&format!("Writing to: {}", path.display()));

    let stats = writer.save_with_stats(doc, path).await?;
    display_write_statistics(formatter, doc.get_pages().len(), &stats);

    Ok(stats.output_path)
}

fn report_dry_run(formatter: &OutputFormatter, outputs: &[PathBuf]) {
    formatter.blank_line();
    formatter.success("Dry run completed successfully");
    for output in outputs {
        formatter.info(&format!("  Output would be: {}", output.display()));
    }
    formatter.info("  Run without --dry-run to write the output");
}

/// Check that `output` can be written, then handle overwrite scenarios.
async fn handle_output_overwrite(
    writer: &PdfWriter,
    output: &Path,
    mode: OverwriteMode,
    formatter: &OutputFormatter,
) -> Result<(), PdfBuilderError> {
    writer.can_write(output).await?;

    if !writer.exists(output).await {
        return Ok(());
    }

    match mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(PdfBuilderError::output_exists(output.to_path_buf())),
        OverwriteMode::Prompt => {
            // Nobody to ask in quiet mode.
            if formatter.is_quiet() {
                return Err(PdfBuilderError::output_exists(output.to_path_buf()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                output.display()
            ));

            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| PdfBuilderError::other(format!("Failed to read input: {err}")))?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(())
            } else {
                Err(PdfBuilderError::Cancelled)
            }
        }
    }
}
