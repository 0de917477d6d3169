pub mod config;
pub mod logging;

// Engine modules, leaf to root.
pub mod archive;
pub mod asset_name;
pub mod error;
pub mod install;
pub mod plan;
pub mod platform;
pub mod release;
pub mod transport;
