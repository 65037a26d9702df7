use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pin_scraper::ProbedImage;
use reqwest::blocking::Client;

/// How much of a title survives into the filename.
pub const TITLE_PREFIX_CHARS: usize = 20;

/// Percent-encoded filename stem for an image title.
pub fn encoded_title(title: &str) -> String {
    let prefix: String = title.chars().take(TITLE_PREFIX_CHARS).collect();
    urlencoding::encode(&prefix).into_owned()
}

/// Filename for a probed image: the truncated, encoded title plus the
/// detected format as the extension.
pub fn target_filename(title: &str, format: &str) -> String {
    format!("{}.{}", encoded_title(title), format)
}

/// Stream one image into the output directory, returning the written
/// path. The directory is assumed to exist; a failed transfer may
/// leave a partial file behind.
pub fn download_image(client: &Client, image: &ProbedImage, dir: &Path) -> Result<PathBuf> {
    let formatted_title = encoded_title(&image.title);
    println!("Downloading {}", formatted_title);

    let path = dir.join(format!("{}.{}", formatted_title, image.probe.format));

    let mut response = client
        .get(&image.image_src)
        .send()
        .with_context(|| format!("Failed to request {}", image.image_src))?
        .error_for_status()
        .with_context(|| format!("Download rejected for {}", image.image_src))?;

    let mut file =
        File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;

    response
        .copy_to(&mut file)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(path)
}
