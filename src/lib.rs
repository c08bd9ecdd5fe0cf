pub mod auction;
pub mod bidding;
pub mod config;
pub mod database;
pub mod error;
pub mod query;
pub mod store;

pub use config::StoreConfig;
pub use error::{ErrorKind, Result, StoreError};
pub use store::AuctionStore;
