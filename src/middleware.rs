// src/middleware.rs

pub mod json;
pub mod scope;
