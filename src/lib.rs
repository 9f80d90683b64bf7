pub mod api;
pub mod config;
pub mod db;
pub mod direct;
pub mod docs;
pub mod error;
pub mod mcp;
pub mod model;
pub mod repl;
pub mod repository;
pub mod routes;
pub mod safety;
pub mod service;
pub mod telemetry;
pub mod tools;
pub mod views;
