pub mod adapter;
pub mod backend;
pub mod bounds;
pub mod config;
pub mod coordinate;
pub mod deferred;
pub mod events;
pub mod input;
pub mod legend;
pub mod notify;
#[cfg(test)]
mod testing;

pub use adapter::MapAdapter;
pub use backend::{BackendError, HostPage, MapBackend};
pub use bounds::{Bounds, MapView};
pub use config::MapConfig;
pub use coordinate::{Coordinate, CoordinateError, validate_coordinate};
pub use deferred::{DeferredQueue, DeferredTask, TaskId};
pub use events::UiEvent;
pub use input::{CoordinateInput, NumberInput};
pub use legend::LegendEntry;
pub use notify::{Notification, NotifyLevel};
