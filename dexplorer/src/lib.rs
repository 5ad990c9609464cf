//! Terminal explorer for the PokeAPI creature database: a master catalog,
//! staged category/numeric/text filters, stat sorting backed by a lazily
//! filled detail cache, and a per-entry detail view.

pub mod action;
pub mod api;
pub mod effect;
pub mod evolution;
pub mod filter;
pub mod reducer;
pub mod state;
pub mod stats;
