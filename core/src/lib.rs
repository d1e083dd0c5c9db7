//! Synthetic CRM data for a gambling operator dashboard.
//!
//! Seeded generators for customers, transactions, campaigns, games,
//! lottery draws and revenue, plus the metrics and insight panels
//! derived from them.

pub mod campaign;
pub mod config;
pub mod customer;
pub mod dataset;
pub mod error;
pub mod game;
pub mod ids;
pub mod insight;
pub mod lottery;
pub mod metrics;
pub mod name_generator;
pub mod provider;
pub mod revenue;
pub mod rng;
pub mod sampler;
pub mod store;
pub mod synthesizer;
pub mod transaction;
pub mod types;
