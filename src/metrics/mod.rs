pub mod ace;
pub mod intersect;
pub mod speed;
