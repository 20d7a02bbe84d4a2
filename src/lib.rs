//! Venture
//!
//! TUI application for browsing structured event logs one page at a time,
//! with per-column substring filters and column selection.
//!
//! Pure Core / Impure Shell:
//!
//! - [`model`] and [`state`] are pure: records, columns, pagination,
//!   filtering and the [`state::ViewCoordinator`] that sequences them
//! - [`source`] is the seam to the outside world: files are decoded by a
//!   [`source::RecordSource`], optionally on a background
//!   [`source::FetchWorker`]
//! - [`view`] draws the coordinator's snapshot with ratatui

pub mod config;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod view;

#[cfg(test)]
mod test_harness;
