// src/util/mod.rs
pub mod media;
pub mod testing;
pub mod text;
