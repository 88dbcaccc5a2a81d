/// City air-quality monitoring service.
///
/// Polls the municipal air-quality API for one city, resolves the
/// relevant monitoring post (fixed id or nearest to a coordinate),
/// normalizes the Ukrainian-labelled measurement set into typed channels,
/// and exposes the latest snapshot plus derived metadata for display.

pub mod analysis;
pub mod channels;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod presentation;
pub mod registry;
pub mod scheduler;
pub mod verify;
