pub mod engine;
pub mod geometry;
pub mod gesture;
pub mod layout;
pub mod model;
pub mod reminder;
pub mod store;
pub mod tui;
