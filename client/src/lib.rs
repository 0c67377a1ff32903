pub mod actions;
pub mod geometry;
pub mod history;
pub mod net;
pub mod persistence;
pub mod raster;
pub mod relay;
pub mod render;
pub mod renderer;
pub mod state;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod canvas;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod ws;

#[cfg(test)]
mod testing;

pub use history::HistoryStack;
pub use persistence::{MemoryStore, SnapshotStore, StorageError, STORAGE_KEY};
pub use relay::{ConnectionState, RelayClient, Transport, TransportError};
pub use renderer::{Renderer, Snapshot, Surface, SurfaceError};
pub use state::EditorState;

#[cfg(target_arch = "wasm32")]
pub use app::run;
