pub mod dedup;
pub mod genesis;
pub mod longitude;
pub mod synoptic;
