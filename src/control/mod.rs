pub mod controller;
pub mod placement;
pub mod succession;

pub use controller::{ControlMessage, TabEventController};
pub use placement::Placement;
pub use succession::SuccessionAction;
