pub mod basin;
pub mod observation;
pub mod schema;
pub mod storm;
