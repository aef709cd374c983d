pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod editor;
pub mod error;
pub mod handlers;
pub mod state;
