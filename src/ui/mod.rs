/// View layer
///
/// Pure functions from session state to widgets; nothing here mutates state.

pub mod form;
pub mod grid;
pub mod preview;
pub mod status;
