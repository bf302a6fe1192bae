//! # Facade Module
//!
//! Logic layer between the HTTP endpoints and the relational store.
//!
//! Each façade operation is a function of (path parameters, request body) that issues
//! one or more store requests and shapes their result into a response body. Façades hold
//! no state of their own: every call re-reads the store.
//!
//! * **Query construction:** store requests ([`crate::query::Select`] and friends) are
//!   built by small functions that can be inspected in isolation.
//! * **Response shaping:** listings, single rows, inserted/updated rows and the tables
//!   dump are typed and serialized as they are returned to callers.

mod facade_dump;
pub use facade_dump::*;

mod facade_error;
pub use facade_error::*;

mod facade_marketplace;
pub use facade_marketplace::*;
