//! CLI command implementations.

pub mod common;
pub mod gates;
pub mod replay;
pub mod simulate;
pub mod version;
