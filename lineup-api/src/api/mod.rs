//! HTTP API handlers for lineup-api

pub mod buildinfo;
pub mod health;
pub mod lineups;
pub mod reference;
pub mod sse;
pub mod submissions;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use lineups::{clear_lineups, create_lineup, list_lineups, print_lineups};
pub use reference::{list_breeds, list_categories, list_shows};
pub use sse::{event_stream, push_config};
pub use submissions::{create_submission, list_exhibitors, list_submissions, match_submissions};
