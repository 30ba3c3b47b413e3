use crate::decompress::{self, CompressedWith};
use aur_build_common::errors::*;
use aur_build_common::http::Client;
use std::collections::HashSet;
use std::fs;

fn is_remote(path: &str) -> bool {
    path.starts_with("https://") || path.starts_with("http://")
}

pub fn url_or_path(client: &Client, path: &str) -> Result<Vec<u8>> {
    let bytes = if is_remote(path) {
        info!("Downloading {:?}...", path);
        client
            .get(path)
            .send()?
            .error_for_status()?
            .bytes()?
            .to_vec()
    } else {
        info!("Reading {:?}...", path);
        fs::read(path).with_context(|| anyhow!("Failed to read {:?}", path))?
    };

    Ok(bytes)
}

/// Package names in the list, without blank lines and `#` comments
pub fn parse_list(text: &str) -> HashSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Decode a downloaded list into package names.
///
/// Remote lists are always compressed, anything else is most likely an error
/// page. An empty list is refused for every source since the sync step would
/// mark every tracked package as deleted.
pub fn decode_list(bytes: &[u8], remote: bool) -> Result<HashSet<String>> {
    if remote && decompress::detect_compression(bytes) == CompressedWith::Unknown {
        bail!("Downloaded package list is not compressed, refusing to use it");
    }
    let text = decompress::to_string(bytes)?;
    let names = parse_list(&text);
    if names.is_empty() {
        bail!("Package list is empty, refusing to use it");
    }
    Ok(names)
}

/// Fetch the current list of AUR package names.
pub fn fetch_remote_list(client: &Client, source: &str) -> Result<HashSet<String>> {
    let bytes = url_or_path(client, source).context("Failed to fetch package list")?;
    let names = decode_list(&bytes, is_remote(source))
        .with_context(|| anyhow!("Invalid package list from {:?}", source))?;
    info!("Package list contains {} packages", names.len());
    Ok(names)
}
