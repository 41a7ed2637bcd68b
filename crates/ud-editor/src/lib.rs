pub mod builder;
pub mod node;
pub mod registry;
pub mod resync;

pub use builder::{Builder, Labels};
pub use node::{DiagramNode, MovableNode, NodeEvent, NodeStore};
pub use registry::{DiagramRegistry, NodeTable, ReplayReport};
pub use resync::{ResyncController, SyncState};
