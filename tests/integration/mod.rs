//! Cross-component integration tests

mod coalescing_tests;
mod http_tests;
mod pipeline_tests;
