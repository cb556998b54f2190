// Core domain models for Route Bridge

//! # Domain Models Module
//!
//! The only domain record is [`Book`]. The catalog is seeded statically and
//! never changes while the process runs.

pub mod book;

pub use book::{catalog, list_books, Book};
