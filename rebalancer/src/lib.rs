//! tiervault-rebalancer: command-line front end for the tiervault engine.
//!
//! Reads a tiered strategy snapshot (file or stdin), logs anything suspicious
//! about it, and prints either the annotated snapshot as JSON or a per-tier
//! plan table with whole-percent and basis-point settlement columns.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod plan;
