//! GraphQL client for the Admin API.
//!
//! # Overview
//!
//! - [`GraphqlClient`]: executes queries against a shop's Admin API with the
//!   shop's access token
//! - [`GraphqlError`]: transport and non-2xx failures
//! - [`PRODUCTS_QUERY`]: the catalog query served by `POST /api/products`
//!
//! GraphQL-level errors (validation errors, user errors) come back with HTTP
//! status 200 in the body's `errors` field. They are not client errors: the
//! body is returned to the caller as is.

mod client;
mod errors;

pub use client::{GraphqlClient, PRODUCTS_QUERY};
pub use errors::GraphqlError;
