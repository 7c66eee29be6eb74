mod cloth;

pub use cloth::{Cloth, ClothCategory};
