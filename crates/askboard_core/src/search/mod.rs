//! Forum search helpers.
//!
//! Search is a case-insensitive substring match over already-fetched
//! questions; there is no index.

pub mod substring;
