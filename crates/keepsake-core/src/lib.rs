//! # keepsake-core
//!
//! Core crate for Keepsake, a server-side store for persistent
//! ("remember-me") authentication tokens. Contains the [`TokenStore`]
//! contract, the [`TokenRecord`] entity, configuration schemas, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other Keepsake crates.
//!
//! [`TokenStore`]: traits::token_store::TokenStore
//! [`TokenRecord`]: types::record::TokenRecord

pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod traits;
pub mod types;

pub use error::StoreError;
pub use result::StoreResult;
