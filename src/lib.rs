pub mod auth;
pub mod config;
pub mod controllers;
pub mod db;
pub mod models;
pub mod panel;
pub mod section;
pub mod store;
