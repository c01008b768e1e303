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

pub const PROJECT_NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_LISTS_CONFIG: &str = "lists.json";
pub const DEFAULT_TARGET_DIR: &str = "dnsbl.d";

pub const DEFAULT_USER_AGENT: &str =
   "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";

/// Upper bound on a single list download, connect through last body byte.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;

/// Address a sinkholed domain is answered with.
pub const DEFAULT_SINKHOLE_ADDRESS: &str = "0.0.0.0";

pub const DEFAULT_DNS_PORT: u16 = 53;
pub const DEFAULT_DNS_TIMEOUT_MS: u64 = 5000;

/// Headers sent with every list request. No Accept-Encoding, the body is stored exactly as served.
pub static LIST_REQUEST_HEADERS: once_cell::sync::Lazy<reqwest::header::HeaderMap> = once_cell::sync::Lazy::new(|| {
   let mut headers = reqwest::header::HeaderMap::new();
   headers.insert(reqwest::header::ACCEPT, reqwest::header::HeaderValue::from_static("text/plain, */*"));
   headers.insert(reqwest::header::ACCEPT_LANGUAGE, reqwest::header::HeaderValue::from_static("en-US,en;q=0.9"));
   headers.insert(reqwest::header::CACHE_CONTROL, reqwest::header::HeaderValue::from_static("no-cache"));
   headers.insert(reqwest::header::PRAGMA, reqwest::header::HeaderValue::from_static("no-cache"));
   headers
});
