// Leaf handlers for Route Bridge
// These know nothing about routing or hosting; the backend and server layers wire them up

//! # Engine Module
//!
//! - [`random`]: the Random Value Provider
//! - [`echo`]: the Echo Handler
//! - [`graphql`]: the Book Catalog Resolver and its schema

pub mod echo;
pub mod graphql;
pub mod random;

pub use echo::{echo, EchoParam};
pub use graphql::{create_schema, CatalogSchema, Query};
pub use random::{RandomRange, RandomValueProvider};
