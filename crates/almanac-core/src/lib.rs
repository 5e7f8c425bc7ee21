//! # Almanac Core Library
//!
//! A calendar engine that expands recurrence rules on demand, keeps
//! "Nth weekday of the month" rules, and classifies everything on a timeline
//! as past, ongoing or upcoming relative to a virtual clock.
//!
//! ## Features
//!
//! - **On-demand expansion**: Rules are never materialized ahead of time; every
//!   query expands them over exactly the interval asked for
//! - **Inclusive day windows**: Interval queries include both end days
//! - **Stable instance ids**: An expanded instance carries its rule's id
//! - **Explicit clock**: "Now" is a [`clock::VirtualClock`] handed to each query
//! - **Reminders**: Single-shot or cadence-based reminders with window checks
//!
//! ## Core Modules
//!
//! - [`moment`]: Millisecond instants, parsing and day arithmetic
//! - [`clock`]: The virtual clock and its tick units
//! - [`models`]: Occurrences and where they came from
//! - [`recurrence`]: Recurrence rules and their expansion
//! - [`fixed`]: Fixed calendar rules such as statutory holidays
//! - [`reminder`]: Reminders and cadence rules
//! - [`timeline`]: Storage, lookup, classification and date queries
//! - [`alerts`]: Finding due reminders
//! - [`memo`]: Memos and the deletion hook
//! - [`calendar`]: A named calendar, the unit of persistence
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use almanac_core::{
//!     clock::VirtualClock,
//!     moment::Moment,
//!     recurrence::{Frequency, Termination},
//!     timeline::Timeline,
//! };
//!
//! # fn main() -> Result<(), almanac_core::error::CoreError> {
//! let mut timeline = Timeline::new();
//! let start = Moment::from_date_time_strings("01/01/2024", "09:00:am")?;
//! let end = Moment::from_date_time_strings("01/01/2024", "09:15:am")?;
//! timeline.create_recurrence("Standup", "Daily standup", start, end, vec![Frequency::Daily], Termination::FiniteCount(5))?;
//!
//! let clock = VirtualClock::new(Moment::from_date_string("03/01/2024")?);
//! let upcoming = timeline.upcoming(&clock)?;
//! assert_eq!(upcoming.len(), 3);
//! # Ok(())
//! # }
//! ```

pub mod alerts;
pub mod calendar;
pub mod clock;
pub mod error;
pub mod fixed;
pub mod memo;
pub mod models;
pub mod moment;
pub mod recurrence;
pub mod reminder;
pub mod timeline;
