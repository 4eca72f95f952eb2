//! Resume upload, retrieval, and analysis surface.

pub mod extract;
pub mod handlers;
pub mod sanitize;
pub mod validation;
