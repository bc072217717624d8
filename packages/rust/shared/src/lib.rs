//! Shared types, error model, and configuration for nbgallery.
//!
//! This crate is the foundation depended on by all other nbgallery crates.
//! It provides:
//! - [`GalleryError`], the unified error type
//! - Domain types ([`Category`], [`SectionTable`], [`GalleryImage`], [`Section`], [`NotebookRecord`])
//! - Configuration ([`AppConfig`], [`GallerySettings`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, GallerySettings, NotebooksConfig, PageConfig, PathsConfig,
    init_config, load_config, load_config_from,
};
pub use error::{GalleryError, Result};
pub use types::{
    Category, GalleryImage, NotebookRecord, ParseCategoryError, Section, SectionTable,
    ThumbnailSize,
};
