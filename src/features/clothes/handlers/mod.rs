mod cloth_handler;

pub use cloth_handler::*;
