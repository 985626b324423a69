// ABOUTME: tmux backend integration

pub mod client;

pub use client::{inside_tmux, parse_listing, TmuxClient, TmuxError};
