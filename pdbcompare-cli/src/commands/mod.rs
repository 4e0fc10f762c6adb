pub mod common;
pub mod compare;
pub mod dump;
