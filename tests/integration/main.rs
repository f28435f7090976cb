//! Integration tests for the Grok client, run against an in-memory transport.

mod mock_transport;
mod config;
