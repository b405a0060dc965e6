pub mod config;
pub mod facade;
pub mod pipeline;
pub mod registry;
pub mod store;
pub mod tree;
