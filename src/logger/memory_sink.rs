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

use super::{Event, EventSink};
use std::sync::Mutex;

/// Keeps every event in order. Used to inspect a run without touching process-wide logging.
#[derive(Default)]
pub struct MemorySink {
   events: Mutex<Vec<Event>>,
}

impl MemorySink {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn events(&self) -> Vec<Event> {
      match self.events.lock() {
         Ok(events) => events.clone(),
         Err(poisoned) => poisoned.into_inner().clone(),
      }
   }
}

impl EventSink for MemorySink {
   fn emit(&self, event: &Event) {
      match self.events.lock() {
         Ok(mut events) => events.push(event.clone()),
         Err(poisoned) => poisoned.into_inner().push(event.clone()),
      }
   }
}
