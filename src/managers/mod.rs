pub mod agent;
pub mod preset;
