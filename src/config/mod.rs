mod settings;

pub use settings::{CloseBehavior, FocusBehavior, OpenBehavior, Settings, TomlSettings};
