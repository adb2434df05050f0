use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use log::{debug, info};
use reqwest::Url;

use crate::client::HttpGet;
use crate::error::{ApodError, Result};

pub const LOCAL_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded(PathBuf),
    AlreadyPresent(PathBuf),
}

impl DownloadOutcome {
    pub fn path(&self) -> &Path {
        match self {
            DownloadOutcome::Downloaded(path) | DownloadOutcome::AlreadyPresent(path) => path,
        }
    }
}

/// `photo.jpg` on 2024-03-01 becomes `2024-03-01.jpg`.
pub fn name_for_date(original_name: &str, date: NaiveDate) -> String {
    // rsplit always yields at least one piece
    let extension = original_name.rsplit('.').next().unwrap_or(original_name);
    format!("{}.{}", date.format(LOCAL_DATE_FORMAT), extension)
}

fn original_file_name(url: &Url) -> &str {
    url.path_segments()
        .and_then(|segments| segments.last())
        .unwrap_or("")
}

/// Fetches `image_url` into `destination` unless a file for that date and
/// extension is already there. Existing files are never re-fetched or
/// checked.
pub fn download_if_absent<H: HttpGet>(
    http: &H,
    image_url: &Url,
    date: NaiveDate,
    destination: &Path,
) -> Result<DownloadOutcome> {
    let dest_name = name_for_date(original_file_name(image_url), date);
    let dest_path = destination.join(dest_name);

    if fs::exists(&dest_path).map_err(|e| ApodError::io(&dest_path, e))? {
        debug!("Already downloaded {}", dest_path.display());
        return Ok(DownloadOutcome::AlreadyPresent(dest_path));
    }

    let response = http.get(image_url)?;
    if !response.is_ok() {
        return Err(ApodError::Download {
            url: image_url.to_string(),
            status: response.status,
        });
    }

    fs::write(&dest_path, &response.body).map_err(|e| ApodError::io(&dest_path, e))?;
    info!("Saved {} to {}", image_url, dest_path.display());

    Ok(DownloadOutcome::Downloaded(dest_path))
}

/// Deletes files named `YYYY-MM-DD.*` dated strictly before
/// `today - window_days`. Anything that doesn't follow the naming scheme,
/// and every directory, is left alone. Returns the removed paths, sorted.
pub fn prune_older_than(
    window_days: u32,
    destination: &Path,
    today: NaiveDate,
) -> Result<Vec<PathBuf>> {
    let oldest = today
        .checked_sub_days(Days::new(window_days.into()))
        .unwrap_or(NaiveDate::MIN);

    let entries = fs::read_dir(destination).map_err(|e| ApodError::io(destination, e))?;
    let mut removed = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| ApodError::io(destination, e))?;
        let path = entry.path();

        let file_type = entry.file_type().map_err(|e| ApodError::io(&path, e))?;
        if file_type.is_dir() {
            continue;
        }

        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        let stem = file_name.split('.').next().unwrap_or(file_name);
        let Ok(date) = NaiveDate::parse_from_str(stem, LOCAL_DATE_FORMAT) else {
            // some file that doesn't fit the naming scheme
            continue;
        };

        if date < oldest {
            fs::remove_file(&path).map_err(|e| ApodError::io(&path, e))?;
            info!("Removed {} (older than {})", path.display(), oldest);
            removed.push(path);
        }
    }

    removed.sort();
    Ok(removed)
}
