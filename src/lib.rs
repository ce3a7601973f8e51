// src/lib.rs

//! readnext Library

pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod query;
pub mod render;
pub mod services;
pub mod utils;
pub mod view;
