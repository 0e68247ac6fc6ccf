//! Database gateways for rcr-api

pub mod activities;
pub mod catches;
pub mod grilse;
pub mod reference;
pub mod small_catches;
pub mod submissions;
