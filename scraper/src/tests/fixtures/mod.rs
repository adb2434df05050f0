use std::fs;
use std::path::{Path, PathBuf};

/// Saved APOD pages live next to this module; cargo runs tests from the
/// package root.
pub fn fixture_path(fixture_name: &str) -> PathBuf {
    Path::new("src/tests/fixtures").join(format!("{}.html", fixture_name))
}

pub fn load_html_fixture(fixture_name: &str) -> String {
    fs::read_to_string(fixture_path(fixture_name))
        .unwrap_or_else(|_| panic!("Failed to load page fixture: {}", fixture_name))
}
