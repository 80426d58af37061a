//! HTTP route handlers

pub mod ai;
pub mod analysis;
pub mod status;
