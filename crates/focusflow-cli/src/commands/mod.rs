pub mod config;
pub mod sessions;
pub mod stats;
pub mod task;
pub mod timer;
