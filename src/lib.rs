//! Schema-driven CRUD over every table of a SQLite database, with a terminal
//! workstation on top.

pub mod libs;

pub use libs::*;
