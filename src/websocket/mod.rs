mod handler;

pub use handler::{dispatch, ws_handler};
