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

pub mod memory_sink;
pub mod tracing_sink;
pub mod types;

pub use self::memory_sink::MemorySink;
pub use self::tracing_sink::TracingSink;
pub use self::types::{Event, EventSink, SyncEvent, VerifyEvent};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
   #[default]
   Text,
   Json,
}

/// Installs the process-wide subscriber. Only the binary calls this; library code reports through an `EventSink`.
pub fn setup_logging(level: &str, format: LogFormat) {
   let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      let mut filter = level.to_string();

      // hickory is chatty at info, keep it quiet unless asked for
      if !filter.contains("hickory") {
         filter.push_str(",hickory_proto=warn,hickory_resolver=warn");
      }

      tracing_subscriber::EnvFilter::new(filter)
   });

   match format {
      LogFormat::Text => tracing_subscriber::fmt().with_env_filter(env_filter).init(),
      LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(env_filter).init(),
   }
}
