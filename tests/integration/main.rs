//! Integration test harness
//!
//! Drives the crawler against wiremock servers serving directory pages.

mod crawl_tests;
