//! Property test modules

mod search_tests;
mod store_tests;
mod workflow_tests;
