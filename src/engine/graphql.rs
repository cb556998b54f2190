// GraphQL API for the book catalog

//! # Book Catalog Resolver
//!
//! The schema is generated from the `Book` derive, so adding a field to the model
//! adds it to the API. Only a query root exists:
//!
//! ```graphql
//! type Query {
//!   books: [Book!]!
//! }
//! ```
//!
//! Mutations and subscriptions use async-graphql's empty roots, and any mutation
//! operation is rejected at validation time. Introspection stays on, which is what
//! GraphiQL at `GET /api/graphql` relies on.

use async_graphql::{EmptyMutation, EmptySubscription, Object, Schema};
use tracing::debug;

use crate::models::{list_books, Book};

pub type CatalogSchema = Schema<Query, EmptyMutation, EmptySubscription>;

pub struct Query;

#[Object]
impl Query {
    /// All books in the catalog, in catalog order
    async fn books(&self) -> Vec<Book> {
        debug!("Resolving books query");
        list_books()
    }
}

/// Build the catalog schema. Introspection is left enabled.
pub fn create_schema() -> CatalogSchema {
    Schema::build(Query, EmptyMutation, EmptySubscription).finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_books_query_returns_fixed_catalog() {
        let schema = create_schema();
        let response = schema.execute("{ books { id title description } }").await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);

        let data = response.data.into_json().unwrap();
        assert_eq!(
            data,
            json!({
                "books": [
                    {"id": 1, "title": "Book 1", "description": "Description 1"},
                    {"id": 2, "title": "Book 2", "description": "Description 2"},
                    {"id": 3, "title": "Book 3", "description": "Description 3"},
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_partial_selection() {
        let schema = create_schema();
        let response = schema.execute("{ books { title } }").await;
        let data = response.data.into_json().unwrap();
        assert_eq!(data["books"][0], json!({"title": "Book 1"}));
        assert_eq!(data["books"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_introspection_exposes_book_type() {
        let schema = create_schema();
        let response = schema
            .execute(r#"{ __type(name: "Book") { fields { name } } }"#)
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);

        let data = response.data.into_json().unwrap();
        let names: Vec<&str> = data["__type"]["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["id", "title", "description"]);
    }

    #[tokio::test]
    async fn test_schema_has_no_mutations() {
        let schema = create_schema();
        let response = schema.execute("mutation { books { id } }").await;
        assert!(!response.errors.is_empty());
    }
}
