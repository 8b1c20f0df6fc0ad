//! Integration tests for forum-feed
//!
//! These tests use wiremock to stand in for the forum and an in-memory
//! publisher to capture the feeds.

mod crawl_tests;
mod scheduler_tests;
