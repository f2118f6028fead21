pub mod config;
pub mod control;
pub mod host;
pub mod keys;
pub mod replay;
pub mod state;
pub mod util;

pub use config::{CloseBehavior, FocusBehavior, OpenBehavior, Settings};
pub use control::{ControlMessage, Placement, SuccessionAction, TabEventController};
pub use host::{
    HostCommand, HostError, HostEvent, MovePosition, MoveTarget, SimulatedHost, Tab, TabHost,
    TabId, TabQuery, WindowId,
};
pub use keys::{KeyAction, KeyMessage, ModifierKey, ModifierState};
pub use replay::{EventTrace, ReplayReport, TraceEntry, TraceError};
pub use state::{RecencyList, UndoCell, WindowRegistry, WindowState};
