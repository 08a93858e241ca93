//! CRMDesk core: leads and deals moving through a sales pipeline.
//!
//! A [`state::Session`] owns the in-memory records for one dashboard session.
//! The [`services`] modules are the mutation entry points; everything else is
//! pure lookup, filtering, and aggregation over the store.

pub mod activity;
pub mod aggregate;
pub mod board;
pub mod error;
pub mod filter;
pub mod forms;
pub mod seed;
pub mod services;
pub mod stage;
pub mod state;
pub mod store;
pub mod types;
pub mod util;
