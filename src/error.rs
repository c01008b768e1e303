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

use std::path::PathBuf;
use thiserror::Error;

/// Problems with the lists configuration or an expectation fixture. Always fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
   #[error("{} does not exist, please configure it properly. (See {})", path.display(), sample.display())]
   Missing { path: PathBuf, sample: PathBuf },

   #[error("failed to read {}: {source}", path.display())]
   Read {
      path: PathBuf,
      #[source]
      source: std::io::Error,
   },

   #[error(
      "please configure your {} file correctly (must be JSON parse-able data, see {}): {source}",
      path.display(),
      sample.display()
   )]
   Malformed {
      path: PathBuf,
      sample: PathBuf,
      #[source]
      source: serde_json::Error,
   },
}

/// Environment failures that end a sync run before any list is touched.
#[derive(Error, Debug)]
pub enum SyncError {
   #[error("failed to create directory {}: {source}", path.display())]
   TargetDir {
      path: PathBuf,
      #[source]
      source: std::io::Error,
   },
}

/// Why a single list could not be refreshed. Recorded in the report, never propagated.
#[derive(Error, Debug)]
pub enum ItemError {
   #[error("invalid list name {0:?}, names are used verbatim as file names")]
   InvalidName(String),

   #[error(transparent)]
   Fetch(#[from] FetchError),

   #[error("failed to stage temporary file in {}: {source}", dir.display())]
   TempFile {
      dir: PathBuf,
      #[source]
      source: std::io::Error,
   },

   #[error("failed to move downloaded list onto {}: {source}", path.display())]
   Persist {
      path: PathBuf,
      #[source]
      source: std::io::Error,
   },
}

#[derive(Error, Debug)]
pub enum FetchError {
   #[error("request to {url} failed: {source}")]
   Http {
      url: String,
      #[source]
      source: reqwest::Error,
   },

   #[error("{url} answered with HTTP {status}")]
   Status { url: String, status: u16 },

   #[error("failed writing body of {url}: {source}")]
   Write {
      url: String,
      #[source]
      source: std::io::Error,
   },
}

/// Caller contract violations detected before any DNS query is sent.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VerifyError {
   #[error("resolver address is a required value")]
   MissingResolver,

   #[error("invalid resolver address {0:?}, expected <ip> or <ip>:<port>")]
   InvalidResolver(String),

   #[error("record type is a required value (domain {domain})")]
   MissingRecordType { domain: String },

   #[error("unknown record type {record_type:?} for domain {domain}")]
   InvalidRecordType { domain: String, record_type: String },
}
