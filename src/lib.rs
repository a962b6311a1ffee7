// Shirushi Poster Badge Overlay Library
// Module declarations will be added as we implement them

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod overlay;
pub mod pipeline;
pub mod providers;
pub mod proxy;
