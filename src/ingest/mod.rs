/// Upstream data ingestion.
///
/// Submodules:
/// - `city_api` — HTTP client for the city air-quality monitoring API.

pub mod city_api;
