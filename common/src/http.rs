use crate::errors::*;
pub use reqwest::blocking::Client;
use std::time::Duration;

pub fn client() -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(60))
        .timeout(Duration::from_secs(300))
        .build()
        .map_err(Error::from)
}
