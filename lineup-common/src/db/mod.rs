//! Database models and queries

pub mod init;
pub mod lineups;
pub mod models;
pub mod reference;
pub mod submissions;

pub use init::*;
pub use models::*;
