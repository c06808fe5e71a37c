pub mod env;
pub mod guard;
