//! Progressive Web App assets generated per page

pub mod handlers;
pub mod manifest;
pub mod offline;
pub mod service_worker;

pub use manifest::build_manifest;
