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

mod args;

use anyhow::Context;
use args::{Args, Command};
use clap::Parser;
use faf_dnsbl::config::ListsConfig;
use faf_dnsbl::fetch::HttpFetcher;
use faf_dnsbl::logger::{setup_logging, TracingSink};
use faf_dnsbl::lookup::HickoryLookup;
use faf_dnsbl::statics;
use faf_dnsbl::sync::{synchronize, SyncOptions};
use faf_dnsbl::verify::{validate, verify, ExpectationTable, VerificationSummary, VerifyOptions};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

/// `verify --strict` with at least one failing case.
const EXIT_CASES_FAILED: u8 = 2;

pub fn main() -> ExitCode {
   let args = Args::parse();
   setup_logging(&args.log_level, args.log_format);
   info!("{} v{}", statics::PROJECT_NAME, statics::VERSION);

   let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
      Ok(runtime) => runtime,
      Err(e) => {
         error!("failed to start runtime: {}", e);
         return ExitCode::FAILURE;
      }
   };

   match runtime.block_on(run(args)) {
      Ok(code) => code,
      Err(e) => {
         error!("{:#}", e);
         ExitCode::FAILURE
      }
   }
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
   let sink = TracingSink::new(args.log_format);

   match args.command {
      Command::Sync { config, target_dir, timeout_secs, skip_unchanged, user_agent } => {
         // configuration problems end the run before any network I/O
         let lists = ListsConfig::load(&config)?;
         let fetcher =
            HttpFetcher::new(&user_agent, Duration::from_secs(timeout_secs)).context("failed to build the HTTP client")?;

         info!("Syncing {} lists into {}", lists.len(), target_dir.display());
         let report = synchronize(&lists, &target_dir, &fetcher, &sink, &SyncOptions { skip_unchanged }).await?;
         if !report.is_empty() {
            info!("{}", report);
         }
         Ok(ExitCode::SUCCESS)
      }

      Command::Verify { cases, resolver, sinkhole_address, timeout_ms, verbose, strict } => {
         let table = ExpectationTable::load(&cases)?;

         let resolver_address = resolver.or(table.resolver).unwrap_or_default();
         let sinkhole_address =
            sinkhole_address.or(table.sinkhole_address).unwrap_or_else(|| statics::DEFAULT_SINKHOLE_ADDRESS.to_string());

         // a bad table or resolver is rejected before any query goes out
         let (server, _) = validate(&table.cases, &resolver_address)?;
         let lookup = HickoryLookup::new(server, Duration::from_millis(timeout_ms));
         info!("Verifying {} cases against {}", table.cases.len(), lookup.server());

         let options = VerifyOptions { sinkhole_address, verbose };
         let reports = verify(&table.cases, &resolver_address, &lookup, &sink, &options).await?;

         let summary = VerificationSummary::from_reports(&reports);
         if strict && !summary.all_passed() {
            return Ok(ExitCode::from(EXIT_CASES_FAILED));
         }
         Ok(ExitCode::SUCCESS)
      }
   }
}
