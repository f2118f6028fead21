pub mod recency;
pub mod registry;
pub mod undo;
pub mod window;

pub use recency::RecencyList;
pub use registry::WindowRegistry;
pub use undo::UndoCell;
pub use window::WindowState;
