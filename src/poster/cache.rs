use image::{imageops::FilterType, ImageFormat};
use reqwest::Client;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Posters are downscaled to fit this box (2:3, like the source images)
const POSTER_WIDTH: u32 = 342;
const POSTER_HEIGHT: u32 = 513;

/// On-disk poster cache
#[derive(Debug, Clone)]
pub struct PosterCache {
    client: Client,
    dir: PathBuf,
}

impl PosterCache {
    /// Create a cache rooted at `dir`, creating it if needed
    pub fn new(client: Client, dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { client, dir })
    }

    /// Cache in ~/.cache/movie-finder/posters on Linux
    pub fn in_user_cache(client: Client) -> Result<Self> {
        let mut path = dirs_next::cache_dir()
            .or_else(dirs_next::home_dir)
            .ok_or_else(|| Error::Config("could not determine cache directory".into()))?;

        path.push("movie-finder");
        path.push("posters");
        Self::new(client, path)
    }

    /// Where the poster for `url` is (or would be) cached
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(cache_file_name(url))
    }

    /// Return the cached poster for `url`, downloading it first if needed
    pub async fn fetch(&self, url: &str) -> Result<PathBuf> {
        let target = self.path_for(url);
        if tokio::fs::try_exists(&target).await? {
            return Ok(target);
        }

        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(Error::Status {
                status: resp.status(),
                url: url.to_string(),
            });
        }
        let bytes = resp.bytes().await?;

        // Decoding and resizing is CPU-bound
        let dest = target.clone();
        tokio::task::spawn_blocking(move || save_poster(&bytes, &dest)).await??;

        tracing::debug!("📸 Cached poster: {}", target.display());
        Ok(target)
    }
}

/// Decode, downscale and save as JPEG
fn save_poster(data: &[u8], dest: &Path) -> Result<()> {
    let img = image::load_from_memory(data)?;

    let poster = if img.width() > POSTER_WIDTH || img.height() > POSTER_HEIGHT {
        img.resize(POSTER_WIDTH, POSTER_HEIGHT, FilterType::Lanczos3)
    } else {
        img
    };

    // JPEG has no alpha channel
    let rgb = poster.to_rgb8();
    write_atomically(dest, |file| {
        let mut writer = BufWriter::new(file);
        rgb.write_to(&mut writer, ImageFormat::Jpeg)?;
        writer.flush()?;
        Ok(())
    })
}

/// Write into a sibling temp file and rename it over `dest` only once
/// `write` succeeded. A cache hit is only ever a complete file.
fn write_atomically(dest: &Path, write: impl FnOnce(&mut File) -> Result<()>) -> Result<()> {
    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;

    // On error `tmp` is dropped and removed
    write(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

/// Poster URLs end in a unique file name ("/t/p/w500/abc123.jpg"),
/// which is reused as the cache key.
fn cache_file_name(url: &str) -> String {
    let last = url
        .split('?')
        .next()
        .unwrap_or_default()
        .rsplit('/')
        .next()
        .unwrap_or_default();

    let stem: String = last
        .rsplit_once('.')
        .map_or(last, |(stem, _)| stem)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    if stem.is_empty() {
        "poster.jpg".to_string()
    } else {
        format!("{stem}.jpg")
    }
}
