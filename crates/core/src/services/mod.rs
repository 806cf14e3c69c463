pub mod alert_service;
pub mod auth_service;
pub mod portfolio_service;
pub mod watchlist_service;
