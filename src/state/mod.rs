/// State management module
///
/// This module handles all application state, including:
/// - The eight ordered photo slots (slots.rs)
/// - Shared data structures and form values (data.rs)
/// - The ordered upload queue (upload.rs)
/// - Status log and progress (status.rs)
/// - The session tying them together for the UI (session.rs)

pub mod data;
pub mod session;
pub mod slots;
pub mod status;
pub mod upload;
