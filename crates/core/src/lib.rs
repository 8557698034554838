//! Domain types, constants, and validation rules shared by the database and
//! API layers. This crate performs no I/O.

pub mod error;
pub mod roles;
pub mod stats;
pub mod task_graph;
pub mod types;
