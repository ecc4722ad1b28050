pub mod adapters;
pub mod chunking;
pub mod config;
pub mod error;
pub mod generation;
pub mod web;

#[cfg(test)]
mod test_support;
