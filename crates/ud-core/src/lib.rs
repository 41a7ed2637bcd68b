pub mod codec;
pub mod config;
pub mod connector;
pub mod error;
pub mod geometry;
pub mod id;
pub mod label;
pub mod model;
pub mod scene;

pub use codec::DiagramSnapshot;
pub use config::EngineConfig;
pub use connector::{ConnectorGeometry, Marker, layout_connector};
pub use error::{BuildError, CodecError, Endpoint, RegistryError};
pub use geometry::{Anchor, Side, boundary_anchor, closest_boundary_point, closest_vertex};
pub use id::{ConnectorId, NodeId, PrimitiveId};
pub use label::{bind_multiplicity_label, bind_name_label};
pub use model::*;
pub use scene::{Primitive, RenderTarget, Surface};

// Re-export kurbo geometry types so downstream crates share one definition
pub use kurbo::{Line, Point, Rect, Size};
