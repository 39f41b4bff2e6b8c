// YouTube Data API v3 — typed client, response shapes, fetcher adapters.
//
// Each submodule handles one layer of the API surface: `client` does the
// HTTP and error classification, `types` holds the serde response shapes,
// and `fetchers` adapts the listing endpoints to the collector's traits.

pub mod client;
pub mod error;
pub mod fetchers;
pub mod types;
