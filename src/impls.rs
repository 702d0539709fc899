pub mod gateway;
pub mod generator;
pub mod tokener;
