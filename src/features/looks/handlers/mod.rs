mod look_handler;

pub use look_handler::*;
