use reqwest::{Client, StatusCode};

use crate::prelude::*;

/// Reachability check for download URLs. Says nothing about integrity.
pub struct Content<'a> {
  http: &'a Client,
}

impl<'a> Content<'a> {
  pub fn new(http: &'a Client) -> Self {
    Self { http }
  }

  pub async fn verify(&self, url: &str) -> Result<()> {
    let response = match self.http.head(url).send().await {
      Ok(response) => response,
      Err(err) => {
        warn!("Could not verify uploaded URL {url}: {err}");
        return Err(Error::UnverifiableContent);
      }
    };

    if response.status() != StatusCode::OK {
      warn!(
        "Could not verify uploaded URL {url} - server returned {}",
        response.status().as_u16()
      );
      return Err(Error::UnverifiableContent);
    }

    Ok(())
  }
}
