// Book records served by the catalog resolver

use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};

/// A single catalog entry
///
/// The GraphQL schema is generated from these fields, so the field order here
/// is the order clients see in introspection.
#[derive(SimpleObject, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub description: String,
}

impl Book {
    pub fn new(id: i32, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
        }
    }
}

lazy_static::lazy_static! {
    static ref CATALOG: Vec<Book> = vec![
        Book::new(1, "Book 1", "Description 1"),
        Book::new(2, "Book 2", "Description 2"),
        Book::new(3, "Book 3", "Description 3"),
    ];
}

/// The fixed, ordered catalog
pub fn catalog() -> &'static [Book] {
    &CATALOG
}

/// Owned copy of the catalog, in catalog order
pub fn list_books() -> Vec<Book> {
    catalog().to_vec()
}
