//! Deck generation, persistence and library flows.

pub mod generator;
pub mod library;
pub mod repository;
pub mod service;
