mod look;

pub use look::Look;
