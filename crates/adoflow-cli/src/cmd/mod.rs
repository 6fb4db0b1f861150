pub mod develop;
pub mod plan;
pub mod review;
