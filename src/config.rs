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

use crate::error::ConfigError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One configured blocklist: the name doubles as the local file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
   pub name: String,
   pub url: String,
}

/// The `lists.json` mapping of list name to source URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(transparent)]
pub struct ListsConfig {
   lists: BTreeMap<String, String>,
}

impl ListsConfig {
   /// Reads and parses the config at `path`. Both a missing file and unparsable content are fatal.
   pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
      let path = path.as_ref();
      let sample = sample_path_for(path);

      if !path.is_file() {
         return Err(ConfigError::Missing { path: path.to_path_buf(), sample });
      }

      let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
      Self::parse(&contents).map_err(|source| ConfigError::Malformed { path: path.to_path_buf(), sample, source })
   }

   pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
      serde_json::from_str(contents)
   }

   pub fn from_pairs<I, K, V>(pairs: I) -> Self
   where
      I: IntoIterator<Item = (K, V)>,
      K: Into<String>,
      V: Into<String>,
   {
      Self { lists: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
   }

   pub fn is_empty(&self) -> bool {
      self.lists.is_empty()
   }

   pub fn len(&self) -> usize {
      self.lists.len()
   }

   /// Entries sorted by name so every run walks the lists in the same order.
   pub fn entries(&self) -> Vec<ListEntry> {
      self.lists.iter().map(|(name, url)| ListEntry { name: name.clone(), url: url.clone() }).collect()
   }
}

/// `dir/lists.json` -> `dir/lists.sample.json`
pub fn sample_path_for(path: &Path) -> PathBuf {
   let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "lists".to_string());
   let extension = path.extension().map(|e| e.to_string_lossy().into_owned()).unwrap_or_else(|| "json".to_string());
   path.with_file_name(format!("{stem}.sample.{extension}"))
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn parses_name_to_url_mapping_in_name_order() {
      let config = ListsConfig::parse(
         r#"{
            "tracking.txt": "https://lists.example/tracking.txt",
            "malware.txt": "http://list.example/malware.txt"
         }"#,
      )
      .unwrap();

      assert_eq!(config.len(), 2);
      let entries = config.entries();
      assert_eq!(entries[0], ListEntry { name: "malware.txt".into(), url: "http://list.example/malware.txt".into() });
      assert_eq!(entries[1].name, "tracking.txt");
   }

   #[test]
   fn rejects_non_string_urls_and_non_objects() {
      assert!(ListsConfig::parse(r#"{"malware.txt": 42}"#).is_err());
      assert!(ListsConfig::parse(r#"["malware.txt"]"#).is_err());
      assert!(ListsConfig::parse("malware.txt = http://list.example").is_err());
   }

   #[test]
   fn empty_object_is_a_valid_empty_config() {
      let config = ListsConfig::parse("{}").unwrap();
      assert!(config.is_empty());
      assert!(config.entries().is_empty());
   }

   #[test]
   fn missing_file_points_at_the_sample() {
      let dir = tempfile::tempdir().unwrap();
      let path = dir.path().join("lists.json");

      match ListsConfig::load(&path) {
         Err(ConfigError::Missing { path: missing, sample }) => {
            assert_eq!(missing, path);
            assert_eq!(sample, dir.path().join("lists.sample.json"));
         }
         other => panic!("expected ConfigError::Missing, got {other:?}"),
      }
   }

   #[test]
   fn malformed_file_is_reported_with_the_sample() {
      let dir = tempfile::tempdir().unwrap();
      let path = dir.path().join("lists.json");
      std::fs::write(&path, "{ not json").unwrap();

      let err = ListsConfig::load(&path).unwrap_err();
      assert!(matches!(err, ConfigError::Malformed { .. }));
      assert!(err.to_string().contains("lists.sample.json"));
   }

   #[test]
   fn sample_path_keeps_directory_and_extension() {
      assert_eq!(sample_path_for(Path::new("/etc/dnsbl/lists.json")), PathBuf::from("/etc/dnsbl/lists.sample.json"));
      assert_eq!(sample_path_for(Path::new("custom")), PathBuf::from("custom.sample.json"));
   }
}
