// kml-stash - relay KML files into a stash endpoint for map display

pub mod config;
pub mod layer;
pub mod stash;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use layer::KmlLayer;
pub use stash::{Deferred, StashClient, StashRelay};
pub use types::{AppError, AppResult};
