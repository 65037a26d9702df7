mod download;

use std::env;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use pin_scraper::ProbedImage;
use reqwest::blocking::Client;

use crate::download::download_image;

/// Tool for scraping an image search page and downloading the results
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Search query for the image search page
    #[arg(long)]
    query: String,

    /// Directory downloaded images are written into, taken relative to
    /// the installed binary
    #[arg(long)]
    output: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("Query: {}, output: {}", cli.query, cli.output);

    let output_dir = validate_inputs(&cli.query, &cli.output)?;

    let images = pin_scraper::scrape(&cli.query)?;

    let client = Client::new();
    download_all(&client, &images, &output_dir)?;

    println!("Done");
    Ok(())
}

/// Check both inputs before any network activity: the query and output
/// must be non-empty and the output must name an existing directory.
fn validate_inputs(query: &str, output: &str) -> Result<PathBuf> {
    if query.is_empty() || output.is_empty() {
        bail!("Input parameters missing");
    }

    resolve_output_dir(output)
}

/// Resolve the output directory against the executable's own location,
/// not the caller's working directory, and require it to exist.
fn resolve_output_dir(output: &str) -> Result<PathBuf> {
    let exe = env::current_exe().context("Failed to locate the running executable")?;
    let base = exe
        .parent()
        .ok_or_else(|| anyhow!("Executable has no parent directory"))?;

    let dir = base.join(output);
    if !dir.is_dir() {
        bail!("Output directory cannot be found");
    }

    Ok(dir)
}

/// Download every image concurrently, one worker per image. Every
/// worker runs to completion, but a single failure fails the batch.
fn download_all(client: &Client, images: &[ProbedImage], dir: &Path) -> Result<Vec<PathBuf>> {
    thread::scope(|scope| {
        let workers: Vec<_> = images
            .iter()
            .map(|image| scope.spawn(move || download_image(client, image, dir)))
            .collect();

        workers
            .into_iter()
            .map(|worker| {
                worker
                    .join()
                    .unwrap_or_else(|_| Err(anyhow!("Download worker panicked")))
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_is_rejected() {
        let err = validate_inputs("", "images").unwrap_err();
        assert_eq!(err.to_string(), "Input parameters missing");
    }

    #[test]
    fn test_empty_output_is_rejected() {
        let err = validate_inputs("cats", "").unwrap_err();
        assert_eq!(err.to_string(), "Input parameters missing");
    }

    #[test]
    fn test_missing_output_directory_is_rejected() {
        let err = validate_inputs("cats", "no-such-directory-here").unwrap_err();
        assert_eq!(err.to_string(), "Output directory cannot be found");
    }

    // The output path is taken relative to the binary, so stage a
    // directory next to the test executable
    #[test]
    fn test_output_directory_next_to_the_binary_is_accepted() {
        let exe = env::current_exe().unwrap();
        let staged = tempfile::tempdir_in(exe.parent().unwrap()).unwrap();
        let name = staged.path().file_name().unwrap().to_str().unwrap();

        let resolved = validate_inputs("cats", name).unwrap();
        assert_eq!(resolved, staged.path());
    }

    #[test]
    fn test_output_pointing_at_a_file_is_rejected() {
        let exe = env::current_exe().unwrap();
        let staged = tempfile::tempdir_in(exe.parent().unwrap()).unwrap();
        let file_path = staged.path().join("not-a-dir");
        std::fs::write(&file_path, b"x").unwrap();

        let name = staged.path().file_name().unwrap().to_str().unwrap();
        let output = format!("{}/not-a-dir", name);

        let err = validate_inputs("cats", &output).unwrap_err();
        assert_eq!(err.to_string(), "Output directory cannot be found");
    }
}
