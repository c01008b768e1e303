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

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
   NoListsConfigured,
   FetchStarted { name: String, url: String, destination: PathBuf },
   FetchSucceeded { name: String, destination: PathBuf, bytes: u64 },
   FetchUnchanged { name: String, destination: PathBuf },
   FetchFailed { name: String, url: String, error: String },
   SyncFinished { fetched: usize, unchanged: usize, failed: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyEvent {
   /// A query produced no usable answer. `verbose` mirrors the caller's request for detail.
   LookupFailed { domain: String, record_type: String, reason: String, verbose: bool },
   CaseFinished { domain: String, record_type: String, expect: String, records: Vec<String>, passed: bool },
   VerifyFinished { total: usize, passed: usize, failed: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
   Sync(SyncEvent),
   Verify(VerifyEvent),
}

impl From<SyncEvent> for Event {
   fn from(event: SyncEvent) -> Self {
      Event::Sync(event)
   }
}

impl From<VerifyEvent> for Event {
   fn from(event: VerifyEvent) -> Self {
      Event::Verify(event)
   }
}

/// Destination for everything the synchronizer and verifier report. Passed explicitly, never global.
pub trait EventSink: Send + Sync {
   fn emit(&self, event: &Event);
}
