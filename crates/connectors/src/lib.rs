pub mod audit;
pub mod error;
pub mod metadata;
pub mod notify;
pub mod postgres;
pub mod store;
