pub mod alert;
pub mod instrument;
pub mod position;
pub mod settings;
pub mod summary;
pub mod user;
pub mod watchlist;
