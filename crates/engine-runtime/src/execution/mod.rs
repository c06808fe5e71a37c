pub mod executor;
pub mod factory;
pub mod phase;
pub mod preview;
