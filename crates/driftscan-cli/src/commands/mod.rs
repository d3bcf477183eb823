// crates/driftscan-cli/src/commands/mod.rs

pub mod collections;
pub mod distance;
pub mod drift;
pub mod embed;
