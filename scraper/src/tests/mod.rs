use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use reqwest::Url;

use crate::client::{HttpGet, HttpResponse};
use crate::error::{ApodError, Result};

pub mod fixtures;

/// Canned responses keyed by URL; anything unknown is a 404. URLs marked
/// unreachable fail the way a refused connection does once reqwest has
/// given up retrying.
#[derive(Default)]
pub struct FakeHttp {
    responses: HashMap<String, HttpResponse>,
    unreachable: HashSet<String>,
    requests: RefCell<Vec<String>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        FakeHttp::default()
    }

    pub fn with(mut self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.responses
            .insert(url.to_string(), HttpResponse::new(status, body));
        self
    }

    pub fn unreachable(mut self, url: &str) -> Self {
        self.unreachable.insert(url.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|r| *r == url).count()
    }
}

impl HttpGet for FakeHttp {
    fn get(&self, url: &Url) -> Result<HttpResponse> {
        self.requests.borrow_mut().push(url.to_string());
        if self.unreachable.contains(url.as_str()) {
            return Err(ApodError::Http(transport_error()));
        }
        Ok(self
            .responses
            .get(url.as_str())
            .cloned()
            .unwrap_or_else(|| HttpResponse::new(404, "Not Found")))
    }
}

/// A genuine `reqwest::Error`, produced without touching the network.
pub fn transport_error() -> reqwest::Error {
    reqwest::blocking::Client::new()
        .get("http://")
        .send()
        .unwrap_err()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
