/*
FaF DNSBL syncs DNS sinkhole blocklists and verifies the sinkhole
Copyright (C) 2022  James Bates

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU Affero General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU Affero General Public License for more details.

You should have received a copy of the GNU Affero General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use crate::error::FetchError;
use std::io::Write;
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
   /// The full body was written to the sink.
   Fetched { bytes: u64 },
   /// The server answered 304 to our If-Modified-Since. Nothing was written.
   NotModified,
}

/// Pulls one list body into a writer. The synchronizer owns where the bytes land.
#[async_trait::async_trait]
pub trait ListFetcher: Send + Sync {
   async fn fetch(
      &self,
      url: &str,
      if_modified_since: Option<SystemTime>,
      sink: &mut (dyn Write + Send),
   ) -> Result<FetchStatus, FetchError>;
}

pub struct HttpFetcher {
   client: reqwest::Client,
}

impl HttpFetcher {
   pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
      let client = reqwest::ClientBuilder::new()
         .min_tls_version(reqwest::tls::Version::TLS_1_2)
         .user_agent(user_agent)
         .default_headers(crate::statics::LIST_REQUEST_HEADERS.clone())
         .timeout(timeout)
         .build()?;

      Ok(Self { client })
   }
}

#[async_trait::async_trait]
impl ListFetcher for HttpFetcher {
   async fn fetch(
      &self,
      url: &str,
      if_modified_since: Option<SystemTime>,
      sink: &mut (dyn Write + Send),
   ) -> Result<FetchStatus, FetchError> {
      let mut request = self.client.get(url);
      if let Some(modified) = if_modified_since {
         request = request.header(reqwest::header::IF_MODIFIED_SINCE, http_date(modified));
      }

      let mut response = request.send().await.map_err(|source| FetchError::Http { url: url.to_string(), source })?;

      let status = response.status();
      if status == reqwest::StatusCode::NOT_MODIFIED && if_modified_since.is_some() {
         return Ok(FetchStatus::NotModified);
      }
      if !status.is_success() {
         return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
      }

      let mut bytes: u64 = 0;
      while let Some(chunk) = response.chunk().await.map_err(|source| FetchError::Http { url: url.to_string(), source })? {
         sink.write_all(&chunk).map_err(|source| FetchError::Write { url: url.to_string(), source })?;
         bytes += chunk.len() as u64;
      }
      sink.flush().map_err(|source| FetchError::Write { url: url.to_string(), source })?;

      Ok(FetchStatus::Fetched { bytes })
   }
}

/// RFC 7231 IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn http_date(time: SystemTime) -> String {
   chrono::DateTime::<chrono::Utc>::from(time).format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn http_date_is_imf_fixdate() {
      let time = SystemTime::UNIX_EPOCH + Duration::from_secs(784111777);
      assert_eq!(http_date(time), "Sun, 06 Nov 1994 08:49:37 GMT");
   }
}
