// ABOUTME: Configuration file installation

pub mod install;

pub use install::{install_config, uninstall_config};
