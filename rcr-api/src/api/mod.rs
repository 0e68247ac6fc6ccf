//! HTTP API handlers for rcr-api

pub mod activities;
pub mod catches;
pub mod grilse;
pub mod health;
pub mod reference;
pub mod small_catches;
pub mod submissions;

pub use activities::activity_routes;
pub use catches::catch_routes;
pub use grilse::grilse_routes;
pub use health::health_routes;
pub use reference::reference_routes;
pub use small_catches::small_catch_routes;
pub use submissions::submission_routes;
