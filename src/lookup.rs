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

use crate::error::VerifyError;
use hickory_resolver::config::{NameServerConfig, ResolveHosts, ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::proto::xfer::Protocol;
use hickory_resolver::proto::ProtoErrorKind;
use hickory_resolver::{ResolveError, ResolveErrorKind, Resolver, TokioResolver};
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

/// Every way a single query can end. Anything but `Success` counts as an empty answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
   Success(Vec<String>),
   DomainNotFound,
   NoMatchingRecords,
   Timeout,
   OtherFailure(String),
}

impl LookupOutcome {
   pub fn records(&self) -> &[String] {
      match self {
         LookupOutcome::Success(records) => records,
         LookupOutcome::DomainNotFound
         | LookupOutcome::NoMatchingRecords
         | LookupOutcome::Timeout
         | LookupOutcome::OtherFailure(_) => &[],
      }
   }

   pub fn into_records(self) -> Vec<String> {
      match self {
         LookupOutcome::Success(records) => records,
         LookupOutcome::DomainNotFound
         | LookupOutcome::NoMatchingRecords
         | LookupOutcome::Timeout
         | LookupOutcome::OtherFailure(_) => Vec::new(),
      }
   }

   pub fn is_success(&self) -> bool {
      matches!(self, LookupOutcome::Success(_))
   }

   /// Builds a success outcome, dropping repeated answers but keeping first-seen order.
   pub fn from_answers<I: IntoIterator<Item = String>>(answers: I) -> Self {
      let mut records: Vec<String> = Vec::new();
      for answer in answers {
         if !records.contains(&answer) {
            records.push(answer);
         }
      }
      LookupOutcome::Success(records)
   }
}

impl std::fmt::Display for LookupOutcome {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      match self {
         LookupOutcome::Success(records) => write!(f, "{records:?}"),
         LookupOutcome::DomainNotFound => f.write_str("the domain does not exist"),
         LookupOutcome::NoMatchingRecords => f.write_str("no records of the requested type"),
         LookupOutcome::Timeout => f.write_str("DNS query timed out"),
         LookupOutcome::OtherFailure(reason) => write!(f, "DNS query failed: {reason}"),
      }
   }
}

/// The resolution capability the verifier depends on.
#[async_trait::async_trait]
pub trait DnsLookup: Send + Sync {
   async fn lookup(&self, domain: &str, record_type: RecordType) -> LookupOutcome;
}

/// `"10.10.10.101"` or `"10.10.10.101:5353"`; a bare address gets port 53.
pub fn parse_resolver_address(address: &str) -> Result<SocketAddr, VerifyError> {
   let address = address.trim();
   if address.is_empty() {
      return Err(VerifyError::MissingResolver);
   }
   if let Ok(socket_addr) = address.parse::<SocketAddr>() {
      return Ok(socket_addr);
   }
   address
      .parse::<IpAddr>()
      .map(|ip| SocketAddr::new(ip, crate::statics::DEFAULT_DNS_PORT))
      .map_err(|_| VerifyError::InvalidResolver(address.to_string()))
}

pub fn parse_record_type(domain: &str, record_type: &str) -> Result<RecordType, VerifyError> {
   let trimmed = record_type.trim();
   if trimmed.is_empty() {
      return Err(VerifyError::MissingRecordType { domain: domain.to_string() });
   }
   match RecordType::from_str(&trimmed.to_ascii_uppercase()) {
      Ok(RecordType::Unknown(_)) | Err(_) => {
         Err(VerifyError::InvalidRecordType { domain: domain.to_string(), record_type: record_type.to_string() })
      }
      Ok(parsed) => Ok(parsed),
   }
}

/// Queries exactly one name server, uncached, so every answer reflects the sinkhole as it is right now.
pub struct HickoryLookup {
   resolver: TokioResolver,
   server: SocketAddr,
}

impl HickoryLookup {
   pub fn new(server: SocketAddr, timeout: Duration) -> Self {
      let mut config = ResolverConfig::new();
      config.add_name_server(NameServerConfig::new(server, Protocol::Udp));
      config.add_name_server(NameServerConfig::new(server, Protocol::Tcp));

      let mut opts = ResolverOpts::default();
      opts.cache_size = 0;
      opts.attempts = 1;
      opts.timeout = timeout;
      opts.use_hosts_file = ResolveHosts::Never;

      let resolver = Resolver::builder_with_config(config, TokioConnectionProvider::default()).with_options(opts).build();

      Self { resolver, server }
   }

   pub fn server(&self) -> SocketAddr {
      self.server
   }
}

#[async_trait::async_trait]
impl DnsLookup for HickoryLookup {
   async fn lookup(&self, domain: &str, record_type: RecordType) -> LookupOutcome {
      match self.resolver.lookup(domain, record_type).await {
         Ok(lookup) => {
            // CNAME chains come back in the same answer, only keep what was asked for
            let answers =
               lookup.iter().filter(|rdata| rdata.record_type() == record_type).map(|rdata| rdata.to_string()).collect::<Vec<_>>();

            if answers.is_empty() {
               LookupOutcome::NoMatchingRecords
            } else {
               LookupOutcome::from_answers(answers)
            }
         }
         Err(error) => classify_error(&error),
      }
   }
}

fn classify_error(error: &ResolveError) -> LookupOutcome {
   let ResolveErrorKind::Proto(proto) = error.kind() else {
      return LookupOutcome::OtherFailure(error.to_string());
   };

   match proto.kind() {
      // SERVFAIL and REFUSED also arrive as an empty answer, only NOERROR means the type is missing
      ProtoErrorKind::NoRecordsFound { response_code, .. } => match *response_code {
         ResponseCode::NXDomain => LookupOutcome::DomainNotFound,
         ResponseCode::NoError => LookupOutcome::NoMatchingRecords,
         _ => LookupOutcome::OtherFailure(error.to_string()),
      },
      ProtoErrorKind::Timeout => LookupOutcome::Timeout,
      _ => LookupOutcome::OtherFailure(error.to_string()),
   }
}
