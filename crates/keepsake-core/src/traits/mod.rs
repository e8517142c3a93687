//! Capability traits implemented by the backend crates.

pub mod token_store;

pub use token_store::TokenStore;
