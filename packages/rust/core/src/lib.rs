//! Core gallery pipeline for nbgallery.
//!
//! This crate ties together notebook scanning, marker extraction, thumbnail
//! generation, and page assembly into the end-to-end `build_gallery` workflow.

pub mod anchor;
pub mod assembler;
pub mod category;
pub mod extract;
pub mod pipeline;
pub mod thumbnail;
pub mod title;

#[cfg(test)]
mod testing;
