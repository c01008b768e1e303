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

use crate::error::{ConfigError, VerifyError};
use crate::logger::{EventSink, VerifyEvent};
use crate::lookup::{parse_record_type, parse_resolver_address, DnsLookup, LookupOutcome};
use hickory_resolver::proto::rr::RecordType;
use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
   /// The sinkhole address must be among the answers.
   Sinkholed,
   /// The domain must answer, and not with the sinkhole address.
   Resolves,
   /// The answers must be exactly this set, order ignored.
   Exact(Vec<String>),
}

impl Expectation {
   pub fn from_expects_resolve(expects_resolve: bool) -> Self {
      if expects_resolve {
         Expectation::Resolves
      } else {
         Expectation::Sinkholed
      }
   }

   pub fn is_met(&self, records: &[String], sinkhole_address: &str) -> bool {
      let sinkholed = records.iter().any(|r| r == sinkhole_address);
      match self {
         Expectation::Sinkholed => sinkholed,
         Expectation::Resolves => !records.is_empty() && !sinkholed,
         Expectation::Exact(expected) => {
            let expected: BTreeSet<&str> = expected.iter().map(String::as_str).collect();
            let actual: BTreeSet<&str> = records.iter().map(String::as_str).collect();
            expected == actual
         }
      }
   }
}

impl std::fmt::Display for Expectation {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      match self {
         Expectation::Sinkholed => f.write_str("sinkholed"),
         Expectation::Resolves => f.write_str("resolves"),
         Expectation::Exact(expected) => write!(f, "exactly {expected:?}"),
      }
   }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct ExpectationCase {
   pub domain: String,
   pub record_type: String,
   pub expect: Expectation,
}

impl ExpectationCase {
   pub fn new(domain: impl Into<String>, record_type: impl Into<String>, expect: Expectation) -> Self {
      Self { domain: domain.into(), record_type: record_type.into(), expect }
   }

   pub fn sinkholed(domain: impl Into<String>, record_type: impl Into<String>) -> Self {
      Self::new(domain, record_type, Expectation::Sinkholed)
   }

   pub fn resolves(domain: impl Into<String>, record_type: impl Into<String>) -> Self {
      Self::new(domain, record_type, Expectation::Resolves)
   }
}

/// A fixture file: the cases plus optional defaults for where and what to check.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ExpectationTable {
   #[serde(default)]
   pub resolver: Option<String>,
   #[serde(default)]
   pub sinkhole_address: Option<String>,
   pub cases: Vec<ExpectationCase>,
}

impl ExpectationTable {
   pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
      let path = path.as_ref();
      let sample = crate::config::sample_path_for(path);

      if !path.is_file() {
         return Err(ConfigError::Missing { path: path.to_path_buf(), sample });
      }

      let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
      serde_json::from_str(&contents).map_err(|source| ConfigError::Malformed { path: path.to_path_buf(), sample, source })
   }
}

#[derive(Debug, Clone)]
pub struct VerifyOptions {
   pub sinkhole_address: String,
   /// Surface lookup failures (NXDOMAIN, timeouts, ...) at info instead of debug.
   pub verbose: bool,
}

impl Default for VerifyOptions {
   fn default() -> Self {
      Self { sinkhole_address: crate::statics::DEFAULT_SINKHOLE_ADDRESS.to_string(), verbose: false }
   }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
   pub case: ExpectationCase,
   pub outcome: LookupOutcome,
   pub records: Vec<String>,
   pub sinkholed: bool,
   pub passed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationSummary {
   pub total: usize,
   pub passed: usize,
   pub failed: usize,
}

impl VerificationSummary {
   pub fn from_reports(reports: &[CaseReport]) -> Self {
      let passed = reports.iter().filter(|r| r.passed).count();
      Self { total: reports.len(), passed, failed: reports.len() - passed }
   }

   pub fn all_passed(&self) -> bool {
      self.failed == 0
   }
}

/// Checks the resolver address and every case up front, so a bad table sends no queries at all.
pub fn validate(cases: &[ExpectationCase], resolver_address: &str) -> Result<(SocketAddr, Vec<RecordType>), VerifyError> {
   let server = parse_resolver_address(resolver_address)?;
   let record_types = cases.iter().map(|case| parse_record_type(&case.domain, &case.record_type)).collect::<Result<Vec<_>, _>>()?;
   Ok((server, record_types))
}

/// Runs every case against the lookup capability and reports each one.
///
/// `resolver_address` must be the address `lookup` talks to; it is validated here so a missing
/// resolver is rejected even when the capability was built some other way.
pub async fn verify(
   cases: &[ExpectationCase],
   resolver_address: &str,
   lookup: &dyn DnsLookup,
   sink: &dyn EventSink,
   options: &VerifyOptions,
) -> Result<Vec<CaseReport>, VerifyError> {
   let (_, record_types) = validate(cases, resolver_address)?;

   let mut reports = Vec::with_capacity(cases.len());
   for (case, record_type) in cases.iter().zip(record_types) {
      let outcome = lookup.lookup(&case.domain, record_type).await;

      if !outcome.is_success() {
         sink.emit(
            &VerifyEvent::LookupFailed {
               domain: case.domain.clone(),
               record_type: case.record_type.clone(),
               reason: outcome.to_string(),
               verbose: options.verbose,
            }
            .into(),
         );
      }

      let records = outcome.records().to_vec();
      let sinkholed = records.iter().any(|r| *r == options.sinkhole_address);
      let passed = case.expect.is_met(&records, &options.sinkhole_address);

      sink.emit(
         &VerifyEvent::CaseFinished {
            domain: case.domain.clone(),
            record_type: case.record_type.clone(),
            expect: case.expect.to_string(),
            records: records.clone(),
            passed,
         }
         .into(),
      );

      reports.push(CaseReport { case: case.clone(), outcome, records, sinkholed, passed });
   }

   let summary = VerificationSummary::from_reports(&reports);
   sink.emit(&VerifyEvent::VerifyFinished { total: summary.total, passed: summary.passed, failed: summary.failed }.into());

   Ok(reports)
}
