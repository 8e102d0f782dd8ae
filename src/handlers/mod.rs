// src/handlers/mod.rs

pub mod post;
