pub mod config;
pub mod error;
pub mod export;
pub mod geo;
pub mod id;
pub mod model;
pub mod store;

pub use config::{MapViewConfig, WidgetConfig};
pub use error::{ConfigError, ExportError, StoreError};
pub use geo::{Bounds, EARTH_RADIUS_M, haversine_distance};
pub use id::{AnnotationId, ShapeId};
pub use model::*;
pub use store::AnnotationStore;
