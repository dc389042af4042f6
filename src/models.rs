// src/models.rs

pub mod conference;
pub mod responses;
pub mod tradeshow;
