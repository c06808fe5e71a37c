pub mod common;
pub mod select;
pub mod update;
