pub mod batch;
pub mod config;
pub mod league;
pub mod output;
pub mod scoring;
pub mod season;
