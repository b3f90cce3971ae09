//! # Blog Core
//!
//! The domain layer of the blog API.
//! This crate contains the post model, request validation, the guard pipeline
//! and the post operations. It has no infrastructure dependencies; persistence
//! and token handling are reached through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod posts;
pub mod validation;

pub use error::DomainError;
