//! Search VOD collector sites and import episodes into a SyncTV room.

pub mod cli;
pub mod collector;
pub mod config;
pub mod logging;
pub mod manifest;
pub mod pipeline;
pub mod sync;
