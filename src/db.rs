// src/db.rs

pub mod conference_repo;
pub use conference_repo::ConferenceRepository;
pub mod tradeshow_repo;
pub use tradeshow_repo::TradeShowRepository;
