pub mod api;
pub mod events;
pub mod sim;

pub use api::{
    HostCommand, HostError, MovePosition, MoveTarget, Tab, TabHost, TabId, TabQuery, WindowId,
};
pub use events::HostEvent;
pub use sim::SimulatedHost;
