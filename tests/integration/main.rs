//! Integration tests for the songbook scraper
//!
//! These tests use wiremock to serve catalog and song pages and drive the
//! full configuration → service → HTTP cycle end-to-end.

mod scrape_tests;
