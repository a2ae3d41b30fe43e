pub mod error;
pub mod generator;
pub mod locate_station;
pub mod normalizer;
pub mod repository;
pub mod store_client;
