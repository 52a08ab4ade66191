//! Plat: plain-text deal tracking for real-estate development
//!
//! A Unix-style toolkit that keeps a development pipeline as plain YAML
//! files under git version control. Deals, proformas, tasks, contacts,
//! and timelines each live in their own file; pipeline and profitability
//! metrics are derived on demand and never stored.

pub mod cli;
pub mod core;
pub mod entities;
pub mod metrics;
pub mod schema;
pub mod yaml;
