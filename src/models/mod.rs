// ABOUTME: Data models shared across the application

pub mod session;

pub use session::TmuxSession;
