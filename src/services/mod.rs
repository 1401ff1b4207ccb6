pub mod browser;
pub mod listing_service;
