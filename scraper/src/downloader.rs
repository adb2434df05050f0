use std::io::Write;
use std::path::PathBuf;

use chrono::{Days, NaiveDate};
use log::{debug, info, warn};

use crate::client::HttpGet;
use crate::error::{ApodError, Result};
use crate::files::{download_if_absent, prune_older_than, DownloadOutcome};
use crate::page::image_url_for_date;

pub const DEFAULT_N_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    pub n_days: u32,
    pub destination: PathBuf,
    pub delete_old: bool,
}

impl DownloadOptions {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        DownloadOptions {
            n_days: DEFAULT_N_DAYS,
            destination: destination.into(),
            delete_old: false,
        }
    }
}

pub struct Downloader<H> {
    http: H,
    destination: PathBuf,
}

impl<H: HttpGet> Downloader<H> {
    /// Fails with a config error unless `destination` is an existing
    /// directory. Nothing touches the network before this check.
    pub fn new(http: H, destination: impl Into<PathBuf>) -> Result<Self> {
        let destination = destination.into();
        if !destination.is_dir() {
            return Err(ApodError::Config(format!(
                "'{}' is not a valid directory",
                destination.display()
            )));
        }
        Ok(Downloader { http, destination })
    }

    pub fn download_for_date(&self, date: NaiveDate) -> Result<DownloadOutcome> {
        let image_url = image_url_for_date(&self.http, date)?;
        download_if_absent(&self.http, &image_url, date, &self.destination)
    }

    /// Walks back `n_days` days from `today` (inclusive). A date that can't
    /// be fetched is reported on `errors` and skipped; only filesystem
    /// failures end the loop early.
    pub fn download_recent<W: Write>(
        &self,
        today: NaiveDate,
        n_days: u32,
        errors: &mut W,
    ) -> Result<()> {
        for i in 0..n_days {
            let Some(date) = today.checked_sub_days(Days::new(i.into())) else {
                break;
            };

            match self.download_for_date(date) {
                Ok(_) => {}
                Err(e) if e.is_per_date() => {
                    warn!("{}: {}", date, e);
                    // a closed error stream must not stop the downloads
                    if let Err(write_err) = writeln!(errors, "Couldn't get image for {}", date) {
                        debug!("Couldn't report failure for {}: {}", date, write_err);
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    pub fn prune(&self, window_days: u32, today: NaiveDate) -> Result<Vec<PathBuf>> {
        let removed = prune_older_than(window_days, &self.destination, today)?;
        if !removed.is_empty() {
            info!("Removed {} old photo(s)", removed.len());
        }
        Ok(removed)
    }
}

/// Download the trailing window of photos, then sweep out the old ones if
/// asked to.
pub fn run<H: HttpGet, W: Write>(
    http: H,
    options: &DownloadOptions,
    today: NaiveDate,
    errors: &mut W,
) -> Result<()> {
    let downloader = Downloader::new(http, &options.destination)?;
    downloader.download_recent(today, options.n_days, errors)?;

    if options.delete_old {
        downloader.prune(options.n_days, today)?;
    }

    Ok(())
}
