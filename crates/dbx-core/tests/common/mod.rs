//! Shared helpers for dbx-core integration tests.

#![allow(dead_code)]

pub mod fake_http;
pub mod page_server;
