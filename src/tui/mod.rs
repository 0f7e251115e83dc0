pub mod app;
pub mod editor;
pub mod input;
pub mod render;

pub use app::run;
