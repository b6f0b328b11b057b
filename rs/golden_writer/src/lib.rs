pub mod args;
pub mod config;
pub mod generator;
pub mod output;
pub mod sampler;
pub mod verify;
