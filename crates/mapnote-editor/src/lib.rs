pub mod app;
pub mod controller;
pub mod form;
pub mod input;
pub mod list;
pub mod measure;
pub mod shortcuts;
pub mod surface;
pub mod tools;

pub use app::AnnotationApp;
pub use surface::{MapSurface, ShapeStyle};
pub use tools::ToolKind;
