pub mod bounds;
pub mod coordinates;
