//! Calendar event sources.
//!
//! Events can be read from a public iCal feed ([`IcsFeedClient`]), the Google
//! Calendar API ([`GoogleCalendarSource`]) or a local `.ics` file
//! ([`LocalIcsSource`]). All of them implement [`EventSource`].
//!
//! ```no_run
//! use cal_feed_rs::{source_for, EventSource, Zone};
//!
//! # async fn run() -> cal_feed_rs::Result<()> {
//! let zone = Zone::Local;
//! let range = zone.parse_date_range("2026-02-01:2026-02-28").expect("valid range");
//! let source = source_for("https://example.com/calendar.ics", None, zone)?;
//! let events = source.fetch(&range).await?;
//! println!("{} events", events.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod google;
pub mod ics;
pub mod local;
mod retry;
pub mod source;
pub mod zone;

pub use client::{IcsFeedClient, IcsFeedClientBuilder};
pub use error::{ApiError, FeedError, Result};
pub use google::GoogleCalendarSource;
pub use local::LocalIcsSource;
pub use retry::RetryConfig;
pub use source::{is_ics_url, source_for, CalendarSource, EventSource};
pub use zone::Zone;
