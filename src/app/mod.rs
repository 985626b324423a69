// ABOUTME: Application state machine and event plumbing

pub mod attach_handler;
pub mod events;
pub mod state;

pub use events::{dispatch, AppEvent, Command};
pub use state::{AppState, ExitRequest, InputMode};
