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

use crate::config::{ListEntry, ListsConfig};
use crate::error::{ItemError, SyncError};
use crate::fetch::{FetchStatus, ListFetcher};
use crate::logger::{EventSink, SyncEvent};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
   /// Send If-Modified-Since based on the local file's mtime and keep the file on 304.
   pub skip_unchanged: bool,
}

#[derive(Debug)]
pub enum ItemOutcome {
   Fetched { bytes: u64 },
   Unchanged,
   Failed(ItemError),
}

#[derive(Debug, Default)]
pub struct SyncReport {
   outcomes: Vec<(String, ItemOutcome)>,
}

impl SyncReport {
   pub fn outcomes(&self) -> &[(String, ItemOutcome)] {
      &self.outcomes
   }

   pub fn outcome(&self, name: &str) -> Option<&ItemOutcome> {
      self.outcomes.iter().find(|(n, _)| n == name).map(|(_, o)| o)
   }

   pub fn fetched(&self) -> impl Iterator<Item = &str> {
      self.outcomes.iter().filter(|(_, o)| matches!(o, ItemOutcome::Fetched { .. })).map(|(n, _)| n.as_str())
   }

   pub fn unchanged(&self) -> impl Iterator<Item = &str> {
      self.outcomes.iter().filter(|(_, o)| matches!(o, ItemOutcome::Unchanged)).map(|(n, _)| n.as_str())
   }

   pub fn failed(&self) -> impl Iterator<Item = (&str, &ItemError)> {
      self.outcomes.iter().filter_map(|(n, o)| match o {
         ItemOutcome::Failed(e) => Some((n.as_str(), e)),
         _ => None,
      })
   }

   pub fn is_success(&self) -> bool {
      self.failed().next().is_none()
   }

   pub fn is_empty(&self) -> bool {
      self.outcomes.is_empty()
   }
}

impl std::fmt::Display for SyncReport {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      write!(f, "{} downloaded, {} unchanged, {} failed", self.fetched().count(), self.unchanged().count(), self.failed().count())?;
      for (name, error) in self.failed() {
         write!(f, "\n  {name}: {error}")?;
      }
      Ok(())
   }
}

/// Refreshes every configured list under `target_dir`, one at a time.
///
/// Only a target directory that cannot be created aborts the run. Any per-list failure is
/// recorded in the report and leaves that list's previous file untouched.
pub async fn synchronize(
   config: &ListsConfig,
   target_dir: &Path,
   fetcher: &dyn ListFetcher,
   sink: &dyn EventSink,
   options: &SyncOptions,
) -> Result<SyncReport, SyncError> {
   let mut report = SyncReport::default();

   if config.is_empty() {
      sink.emit(&SyncEvent::NoListsConfigured.into());
      return Ok(report);
   }

   std::fs::create_dir_all(target_dir).map_err(|source| SyncError::TargetDir { path: target_dir.to_path_buf(), source })?;

   for entry in config.entries() {
      let outcome = match sync_one(&entry, target_dir, fetcher, sink, options).await {
         Ok(outcome) => outcome,
         Err(error) => {
            sink.emit(&SyncEvent::FetchFailed { name: entry.name.clone(), url: entry.url.clone(), error: error.to_string() }.into());
            ItemOutcome::Failed(error)
         }
      };
      report.outcomes.push((entry.name, outcome));
   }

   sink.emit(
      &SyncEvent::SyncFinished {
         fetched: report.fetched().count(),
         unchanged: report.unchanged().count(),
         failed: report.failed().count(),
      }
      .into(),
   );

   Ok(report)
}

async fn sync_one(
   entry: &ListEntry,
   target_dir: &Path,
   fetcher: &dyn ListFetcher,
   sink: &dyn EventSink,
   options: &SyncOptions,
) -> Result<ItemOutcome, ItemError> {
   validate_list_name(&entry.name)?;

   let destination: PathBuf = target_dir.join(&entry.name);
   sink.emit(&SyncEvent::FetchStarted { name: entry.name.clone(), url: entry.url.clone(), destination: destination.clone() }.into());

   let if_modified_since =
      if options.skip_unchanged { std::fs::metadata(&destination).and_then(|meta| meta.modified()).ok() } else { None };

   // staged next to the destination so the final rename never crosses filesystems;
   // dropping it on any early return removes it
   let mut staged = tempfile::Builder::new()
      .prefix(&staging_prefix(&entry.name))
      .suffix(".tmp")
      .tempfile_in(target_dir)
      .map_err(|source| ItemError::TempFile { dir: target_dir.to_path_buf(), source })?;

   let bytes = match fetcher.fetch(&entry.url, if_modified_since, staged.as_file_mut()).await? {
      FetchStatus::NotModified => {
         sink.emit(&SyncEvent::FetchUnchanged { name: entry.name.clone(), destination }.into());
         return Ok(ItemOutcome::Unchanged);
      }
      FetchStatus::Fetched { bytes } => bytes,
   };

   let persist_err = |source: std::io::Error| ItemError::Persist { path: destination.clone(), source };

   staged.as_file().sync_all().map_err(persist_err)?;

   // tempfile creates 0600, the sinkhole engine usually runs as another user
   #[cfg(unix)]
   {
      use std::os::unix::fs::PermissionsExt;
      staged.as_file().set_permissions(std::fs::Permissions::from_mode(0o644)).map_err(persist_err)?;
   }

   staged.persist(&destination).map_err(|e| persist_err(e.error))?;

   sink.emit(&SyncEvent::FetchSucceeded { name: entry.name.clone(), destination, bytes }.into());
   Ok(ItemOutcome::Fetched { bytes })
}

/// Longest slice of the list name kept in a temp file name. The random part and `.tmp`
/// still have to fit under NAME_MAX next to it.
const STAGING_NAME_MAX: usize = 64;

fn staging_prefix(name: &str) -> String {
   let mut end = name.len().min(STAGING_NAME_MAX);
   while !name.is_char_boundary(end) {
      end -= 1;
   }
   format!(".{}.", &name[..end])
}

/// List names become file names verbatim, so anything that could leave `target_dir` is refused.
pub fn validate_list_name(name: &str) -> Result<(), ItemError> {
   let invalid = name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\', '\0']);
   if invalid {
      return Err(ItemError::InvalidName(name.to_string()));
   }
   Ok(())
}
