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

use clap::{Parser, Subcommand};
use faf_dnsbl::logger::LogFormat;
use faf_dnsbl::statics;

/// FaF DNSBL - keep sinkhole blocklists fresh, then check the sinkhole answers the way it should
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
   /// log filter, e.g. `info` or `faf_dnsbl=debug`. RUST_LOG takes precedence.
   #[clap(long, global = true, default_value = "info")]
   pub log_level: String,

   /// log output format.
   #[clap(long, global = true, value_enum, default_value_t = LogFormat::Text)]
   pub log_format: LogFormat,

   #[clap(subcommand)]
   pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
   /// download every configured blocklist into the target directory.
   Sync {
      /// JSON object mapping list name to source url.
      #[clap(short, long, default_value = statics::DEFAULT_LISTS_CONFIG)]
      config: std::path::PathBuf,

      /// directory the lists are written to, created if missing.
      #[clap(short, long, default_value = statics::DEFAULT_TARGET_DIR)]
      target_dir: std::path::PathBuf,

      /// per-list download timeout in seconds.
      #[clap(long, default_value_t = statics::DEFAULT_FETCH_TIMEOUT_SECS)]
      timeout_secs: u64,

      /// ask the server for changes since the local copy and keep it on 304 Not Modified.
      #[clap(long)]
      skip_unchanged: bool,

      /// user agent sent with list requests.
      #[clap(long, default_value = statics::DEFAULT_USER_AGENT)]
      user_agent: String,
   },

   /// query the sinkhole resolver for each expectation case and report pass/fail.
   Verify {
      /// JSON fixture with the expectation cases.
      #[clap(long)]
      cases: std::path::PathBuf,

      /// resolver to query, <ip> or <ip>:<port>. Overrides the fixture's `resolver`.
      #[clap(short, long)]
      resolver: Option<String>,

      /// answer that marks a domain as sinkholed. Overrides the fixture's `sinkhole_address`.
      #[clap(long)]
      sinkhole_address: Option<String>,

      /// per-query timeout in milliseconds.
      #[clap(long, default_value_t = statics::DEFAULT_DNS_TIMEOUT_MS)]
      timeout_ms: u64,

      /// report NXDOMAIN, empty answers and timeouts at info level.
      #[clap(short, long)]
      verbose: bool,

      /// exit with status 2 when any case fails.
      #[clap(long)]
      strict: bool,
   },
}
