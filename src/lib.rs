//! Prompt-to-placeholder image backend: validates prompts, derives
//! deterministic placeholder image URLs, and records each generation in a
//! document store.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod generation;
pub mod routes;
pub mod store;

#[cfg(test)]
mod test_support;
