//! CLI commands

pub mod mappers;
pub mod synth;
