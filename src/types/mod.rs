pub mod alert;
pub mod config;
pub mod dashboard;
pub mod details;
pub mod market;
pub mod portfolio;
pub mod risk;
pub mod ws;

pub use alert::*;
pub use config::*;
pub use dashboard::*;
pub use details::*;
pub use market::*;
pub use portfolio::*;
pub use risk::*;
pub use ws::*;
