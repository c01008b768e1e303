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

use faf_dnsbl::config::ListsConfig;
use faf_dnsbl::error::{ConfigError, FetchError, ItemError};
use faf_dnsbl::fetch::HttpFetcher;
use faf_dnsbl::logger::{Event, MemorySink, SyncEvent};
use faf_dnsbl::sync::{synchronize, ItemOutcome, SyncOptions};
use std::time::Duration;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> HttpFetcher {
   HttpFetcher::new("faf-dnsbl-test", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn downloads_list_byte_for_byte() {
   let server = MockServer::start().await;
   Mock::given(method("GET"))
      .and(path("/malware.txt"))
      .respond_with(ResponseTemplate::new(200).set_body_bytes(b"badhost.com\n".to_vec()))
      .expect(1)
      .mount(&server)
      .await;

   let dir = tempfile::tempdir().unwrap();
   let target = dir.path().join("dnsbl.d");
   let config = ListsConfig::from_pairs([("malware.txt", format!("{}/malware.txt", server.uri()))]);

   let report = synchronize(&config, &target, &fetcher(), &MemorySink::new(), &SyncOptions::default()).await.unwrap();

   assert!(report.is_success());
   assert_eq!(std::fs::read(target.join("malware.txt")).unwrap(), b"badhost.com\n");
}

#[tokio::test]
async fn large_binary_body_is_not_altered() {
   let body: Vec<u8> = (0..256 * 1024).map(|_| fastrand::u8(..)).collect();

   let server = MockServer::start().await;
   Mock::given(method("GET"))
      .and(path("/big.txt"))
      .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
      .mount(&server)
      .await;

   let dir = tempfile::tempdir().unwrap();
   let config = ListsConfig::from_pairs([("big.txt", format!("{}/big.txt", server.uri()))]);

   let report = synchronize(&config, dir.path(), &fetcher(), &MemorySink::new(), &SyncOptions::default()).await.unwrap();

   assert!(matches!(report.outcome("big.txt"), Some(ItemOutcome::Fetched { bytes }) if *bytes == body.len() as u64));
   assert_eq!(std::fs::read(dir.path().join("big.txt")).unwrap(), body);
}

#[tokio::test]
async fn http_errors_leave_existing_lists_alone() {
   let server = MockServer::start().await;
   Mock::given(method("GET")).and(path("/ads.txt")).respond_with(ResponseTemplate::new(500)).mount(&server).await;
   Mock::given(method("GET"))
      .and(path("/tracking.txt"))
      .respond_with(ResponseTemplate::new(200).set_body_string("tracker.example\n"))
      .mount(&server)
      .await;

   let dir = tempfile::tempdir().unwrap();
   std::fs::write(dir.path().join("ads.txt"), "previous.example\n").unwrap();

   let config = ListsConfig::from_pairs([
      ("ads.txt", format!("{}/ads.txt", server.uri())),
      // nothing listens on port 1
      ("offline.txt", "http://127.0.0.1:1/offline.txt".to_string()),
      ("tracking.txt", format!("{}/tracking.txt", server.uri())),
   ]);
   let sink = MemorySink::new();

   let report = synchronize(&config, dir.path(), &fetcher(), &sink, &SyncOptions::default()).await.unwrap();

   assert!(matches!(
      report.outcome("ads.txt"),
      Some(ItemOutcome::Failed(ItemError::Fetch(FetchError::Status { status: 500, .. })))
   ));
   assert!(matches!(report.outcome("offline.txt"), Some(ItemOutcome::Failed(ItemError::Fetch(FetchError::Http { .. })))));
   assert!(matches!(report.outcome("tracking.txt"), Some(ItemOutcome::Fetched { .. })));

   assert_eq!(std::fs::read_to_string(dir.path().join("ads.txt")).unwrap(), "previous.example\n");
   assert!(!dir.path().join("offline.txt").exists());
   assert_eq!(std::fs::read_to_string(dir.path().join("tracking.txt")).unwrap(), "tracker.example\n");

   let leftovers: Vec<_> = std::fs::read_dir(dir.path())
      .unwrap()
      .filter_map(|e| e.ok())
      .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
      .collect();
   assert!(leftovers.is_empty());

   assert_eq!(
      sink.events().last(),
      Some(&Event::Sync(SyncEvent::SyncFinished { fetched: 1, unchanged: 0, failed: 2 }))
   );
}

#[tokio::test]
async fn sends_list_headers() {
   let server = MockServer::start().await;
   Mock::given(method("GET"))
      .and(path("/hosts"))
      .and(header("user-agent", "faf-dnsbl-test"))
      .and(header("cache-control", "no-cache"))
      .respond_with(ResponseTemplate::new(200).set_body_string("0.0.0.0 ads.example\n"))
      .expect(1)
      .mount(&server)
      .await;

   let dir = tempfile::tempdir().unwrap();
   let config = ListsConfig::from_pairs([("hosts", format!("{}/hosts", server.uri()))]);
   let report = synchronize(&config, dir.path(), &fetcher(), &MemorySink::new(), &SyncOptions::default()).await.unwrap();

   assert!(report.is_success());
}

#[tokio::test]
async fn not_modified_keeps_the_local_copy() {
   let server = MockServer::start().await;
   Mock::given(method("GET"))
      .and(path("/ads.txt"))
      .and(header_exists("if-modified-since"))
      .respond_with(ResponseTemplate::new(304))
      .expect(1)
      .mount(&server)
      .await;

   let dir = tempfile::tempdir().unwrap();
   std::fs::write(dir.path().join("ads.txt"), "ads.example\n").unwrap();
   let config = ListsConfig::from_pairs([("ads.txt", format!("{}/ads.txt", server.uri()))]);

   let report =
      synchronize(&config, dir.path(), &fetcher(), &MemorySink::new(), &SyncOptions { skip_unchanged: true }).await.unwrap();

   assert!(matches!(report.outcome("ads.txt"), Some(ItemOutcome::Unchanged)));
   assert_eq!(std::fs::read_to_string(dir.path().join("ads.txt")).unwrap(), "ads.example\n");
}

#[tokio::test]
async fn lists_json_drives_a_full_run() {
   let server = MockServer::start().await;
   Mock::given(method("GET"))
      .and(path("/malware.txt"))
      .respond_with(ResponseTemplate::new(200).set_body_string("badhost.com\n"))
      .mount(&server)
      .await;

   let dir = tempfile::tempdir().unwrap();
   let config_path = dir.path().join("lists.json");
   std::fs::write(&config_path, format!(r#"{{ "malware.txt": "{}/malware.txt" }}"#, server.uri())).unwrap();

   let config = ListsConfig::load(&config_path).unwrap();
   let target = dir.path().join("dnsbl.d");
   synchronize(&config, &target, &fetcher(), &MemorySink::new(), &SyncOptions::default()).await.unwrap();

   assert_eq!(std::fs::read_to_string(target.join("malware.txt")).unwrap(), "badhost.com\n");
}

#[tokio::test]
async fn missing_config_fails_before_any_request() {
   let server = MockServer::start().await;
   Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

   let dir = tempfile::tempdir().unwrap();
   let err = ListsConfig::load(dir.path().join("lists.json")).unwrap_err();

   assert!(matches!(err, ConfigError::Missing { .. }));
   assert!(err.to_string().contains("lists.sample.json"));
}
