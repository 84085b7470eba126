pub mod config;
pub mod media;
pub mod paths;
pub mod state;
pub mod supervisor;
