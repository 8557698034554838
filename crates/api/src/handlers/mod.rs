pub mod graph;
pub mod project;
pub mod stats;
pub mod tasks;
