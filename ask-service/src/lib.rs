//! ask-service: answers questions about the current page with a hosted
//! Gemini model, carrying the conversation forward as a rolling summary.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
