pub mod connection;
pub mod evaluations;

pub use connection::{init_db, Database};
