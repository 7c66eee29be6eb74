pub mod clothes;
pub mod looks;
pub mod removal;
