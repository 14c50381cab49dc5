//! Integration test modules.

mod discovery_test;
mod remote_store_test;
mod store_test;
