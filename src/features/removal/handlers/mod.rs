mod removal_handler;

pub use removal_handler::*;
