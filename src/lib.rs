// ABOUTME: Library crate for tmx exposing the public API for testing

pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod models;
pub mod tmux;
