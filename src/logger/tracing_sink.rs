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

use super::types::{Event, EventSink, SyncEvent, VerifyEvent};
use super::LogFormat;
use tracing::{debug, error, info, warn};

/// Forwards events to whatever `tracing` subscriber the binary installed.
pub struct TracingSink {
   format: LogFormat,
}

impl TracingSink {
   pub fn new(format: LogFormat) -> Self {
      Self { format }
   }

   fn sync_text(event: &SyncEvent) {
      match event {
         SyncEvent::NoListsConfigured => error!("No lists have been configured"),
         SyncEvent::FetchStarted { url, destination, .. } => info!("Downloading {} to {}", url, destination.display()),
         SyncEvent::FetchSucceeded { destination, bytes, .. } => {
            info!("Successfully downloaded {} ({} bytes)", destination.display(), bytes)
         }
         SyncEvent::FetchUnchanged { destination, .. } => info!("{} is up to date, not modified upstream", destination.display()),
         SyncEvent::FetchFailed { name, error, .. } => error!("Skipping {} due to error: {}", name, error),
         SyncEvent::SyncFinished { fetched, unchanged, failed } => {
            info!("Sync finished: {} downloaded, {} unchanged, {} failed", fetched, unchanged, failed)
         }
      }
   }

   fn sync_json(event: &SyncEvent) {
      match event {
         SyncEvent::NoListsConfigured => error!(target: "dnsbl_sync", event = "no_lists"),
         SyncEvent::FetchStarted { name, url, destination } => {
            info!(target: "dnsbl_sync", event = "fetch_started", list = %name, url = %url, dest = %destination.display())
         }
         SyncEvent::FetchSucceeded { name, destination, bytes } => {
            info!(target: "dnsbl_sync", event = "fetch_succeeded", list = %name, dest = %destination.display(), bytes = *bytes)
         }
         SyncEvent::FetchUnchanged { name, destination } => {
            info!(target: "dnsbl_sync", event = "fetch_unchanged", list = %name, dest = %destination.display())
         }
         SyncEvent::FetchFailed { name, url, error } => {
            error!(target: "dnsbl_sync", event = "fetch_failed", list = %name, url = %url, error = %error)
         }
         SyncEvent::SyncFinished { fetched, unchanged, failed } => {
            info!(target: "dnsbl_sync", event = "sync_finished", fetched = *fetched, unchanged = *unchanged, failed = *failed)
         }
      }
   }

   fn verify_text(event: &VerifyEvent) {
      match event {
         VerifyEvent::LookupFailed { domain, record_type, reason, verbose } => {
            if *verbose {
               info!("{} {} lookup: {}", domain, record_type, reason)
            } else {
               debug!("{} {} lookup: {}", domain, record_type, reason)
            }
         }
         VerifyEvent::CaseFinished { domain, record_type, expect, records, passed } => {
            if *passed {
               info!("PASS {} {} {} {:?}", domain, record_type, expect, records)
            } else {
               warn!("FAIL {} {} expected {}, got {:?}", domain, record_type, expect, records)
            }
         }
         VerifyEvent::VerifyFinished { total, passed, failed } => {
            info!("Verification finished: {}/{} passed, {} failed", passed, total, failed)
         }
      }
   }

   fn verify_json(event: &VerifyEvent) {
      match event {
         VerifyEvent::LookupFailed { domain, record_type, reason, verbose } => {
            if *verbose {
               info!(target: "dnsbl_verify", event = "lookup_failed", domain = %domain, r#type = %record_type, reason = %reason)
            } else {
               debug!(target: "dnsbl_verify", event = "lookup_failed", domain = %domain, r#type = %record_type, reason = %reason)
            }
         }
         VerifyEvent::CaseFinished { domain, record_type, expect, records, passed } => {
            if *passed {
               info!(target: "dnsbl_verify", event = "case", domain = %domain, r#type = %record_type, expect = %expect, records = ?records, passed = true)
            } else {
               warn!(target: "dnsbl_verify", event = "case", domain = %domain, r#type = %record_type, expect = %expect, records = ?records, passed = false)
            }
         }
         VerifyEvent::VerifyFinished { total, passed, failed } => {
            info!(target: "dnsbl_verify", event = "verify_finished", total = *total, passed = *passed, failed = *failed)
         }
      }
   }
}

impl EventSink for TracingSink {
   fn emit(&self, event: &Event) {
      match (self.format, event) {
         (LogFormat::Text, Event::Sync(e)) => Self::sync_text(e),
         (LogFormat::Json, Event::Sync(e)) => Self::sync_json(e),
         (LogFormat::Text, Event::Verify(e)) => Self::verify_text(e),
         (LogFormat::Json, Event::Verify(e)) => Self::verify_json(e),
      }
   }
}
