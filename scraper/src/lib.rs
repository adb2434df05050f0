pub mod client;
pub mod downloader;
pub mod error;
pub mod files;
pub mod page;

#[cfg(test)]
pub mod tests;

// Re-export key types and functions for easier access
pub use crate::client::{ApodClient, ClientConfig, HttpGet, HttpResponse, RetryPolicy};
pub use crate::downloader::{run, DownloadOptions, Downloader};
pub use crate::error::{ApodError, Result};
pub use crate::files::{download_if_absent, name_for_date, prune_older_than, DownloadOutcome};
pub use crate::page::{find_image_url, image_url_for_date, is_image, page_url};
