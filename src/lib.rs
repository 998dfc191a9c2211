// lib.rs - Library exports for the range engine and its preview service

pub mod config;
pub mod bootstrap;
pub mod error;
pub mod models;
pub mod math;
pub mod engine;
pub mod web;
