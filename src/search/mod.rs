// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search algorithms: where the rubber meets the road.
//!
//! Everything culminates here. The query has been resolved into slots; now
//! the planner decides which slot ranges and typo levels to try, and the
//! matcher finds the documents for each attempt. Exact matches come first,
//! typos only when too little was found, dropped tokens only as a last resort.

pub mod matcher;
pub mod params;
pub mod planner;
pub mod query;

pub use matcher::{match_all, FieldMatch, Matcher, Matches, SearchField, SlotMatch};
pub use params::{PinnedHit, SearchParams, WILDCARD_QUERY};
pub use planner::{plan, Planner};
pub use query::{slots_from_tokens, Slot};
