//! Chunked block storage: chunks, sections, light channels, and the
//! chunk store with its error taxonomy and tick-boundary snapshots.

pub mod chunk;
pub mod error;
pub mod light;
pub mod section;
pub mod snapshot;
pub mod state;
pub mod store;

pub use chunk::{Chunk, ChunkStatus, VerticalRange};
pub use error::WorldError;
pub use snapshot::WorldSnapshot;
pub use state::{BlockState, PropertyMap};
pub use store::ChunkStore;
