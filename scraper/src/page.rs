use chrono::NaiveDate;
use log::debug;
use reqwest::Url;
use scraper::{Html, Selector};

use crate::client::HttpGet;
use crate::error::{ApodError, Result};

pub const URL_FORMAT: &str = "https://apod.nasa.gov/apod/ap%y%m%d.html";
pub const IMAGE_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".gif"];

/// Daily page address, e.g. `https://apod.nasa.gov/apod/ap240301.html`.
pub fn page_url(date: NaiveDate) -> Url {
    // URL_FORMAT only substitutes digits, so every date yields a valid URL
    Url::parse(&date.format(URL_FORMAT).to_string()).unwrap()
}

/// Case-sensitive suffix match on the URL path; query and fragment are ignored.
pub fn is_image(url: &Url) -> bool {
    IMAGE_EXTENSIONS
        .iter()
        .any(|extension| url.path().ends_with(extension))
}

pub fn fetch_page<H: HttpGet>(http: &H, date: NaiveDate) -> Result<(Url, String)> {
    let url = page_url(date);
    let response = http.get(&url)?;
    if !response.is_ok() {
        return Err(ApodError::Fetch {
            url: url.to_string(),
            status: response.status,
        });
    }
    let html = response.text();
    Ok((url, html))
}

/// First image link inside the page's `<center>` caption block, resolved
/// against `source_url`.
pub fn find_image_url(html: &str, source_url: &Url, date: NaiveDate) -> Result<Url> {
    let document = Html::parse_document(html);
    let center_selector = Selector::parse("center").unwrap();
    let link_selector = Selector::parse("a").unwrap();

    let center = document
        .select(&center_selector)
        .next()
        .ok_or(ApodError::NotFound { date })?;

    center
        .select(&link_selector)
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| source_url.join(href).ok())
        .find(is_image)
        .ok_or(ApodError::NotFound { date })
}

pub fn image_url_for_date<H: HttpGet>(http: &H, date: NaiveDate) -> Result<Url> {
    let (url, html) = fetch_page(http, date)?;
    let image_url = find_image_url(&html, &url, date)?;
    debug!("Image for {}: {}", date, image_url);
    Ok(image_url)
}
