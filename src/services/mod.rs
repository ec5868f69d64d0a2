//! Dashboard generators and the engine that drives them.

pub mod alerts;
pub mod configuration;
pub mod details;
pub mod engine;
pub mod portfolio;
pub mod price_feed;
pub mod random;
pub mod risk;
pub mod scheduler;
pub mod walk;

pub use configuration::ConfigurationState;
pub use engine::DashboardEngine;
pub use random::{RandomSource, SeededSource, SequenceSource};
pub use scheduler::ScheduledTask;
pub use walk::MetricWalk;
