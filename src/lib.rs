pub mod api;
pub mod config;
pub mod db;
pub mod enrollment;
pub mod mail;
pub mod payments;
pub mod telemetry;
