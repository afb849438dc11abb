//! Request handlers

pub mod health;
pub mod labels;
pub mod tracking;
