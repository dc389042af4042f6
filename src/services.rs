// src/services.rs

pub mod conference_service;
pub mod scope_service;
pub mod tradeshow_service;
