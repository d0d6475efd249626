pub mod columns;
pub mod error;
pub mod frame;
pub mod json;
