//! Shared start-up for the `scrape` and `blogsheet-server` binaries.

pub mod bootstrap;
