//! Integration tests for the userdash store and reconciliation policy

mod concurrency;
mod http_client;
mod properties;
mod support;
