pub mod config;
pub mod errors;
pub mod form;
pub mod model;
pub mod narration;
pub mod prompt;
pub mod provider;
pub mod render;
pub mod schema;
pub mod service;
pub mod speech;
pub mod wire;
