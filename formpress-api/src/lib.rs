//! REST surface for the formpress core: layout export and document
//! flattening over HTTP.

pub mod api;

pub use api::app;
