//! Test helpers: throwaway documentation trees and generated PNG payloads.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use nbgallery_shared::GallerySettings;

/// A documentation source tree under the system temp dir, removed on drop.
pub(crate) struct TempTree {
    pub root: PathBuf,
}

impl TempTree {
    pub fn new(label: &str) -> Self {
        let root = std::env::temp_dir().join(format!("nbg-{label}-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    /// Default settings with the tree as the source directory.
    pub fn settings(&self) -> GallerySettings {
        GallerySettings::for_source_dir(&self.root).unwrap()
    }

    /// Write a raw file relative to the root.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Write an nbformat 4 notebook with the given cells.
    pub fn notebook(&self, rel: &str, cells: serde_json::Value) -> PathBuf {
        let nb = serde_json::json!({
            "cells": cells,
            "metadata": {},
            "nbformat": 4,
            "nbformat_minor": 5
        });
        self.write(rel, &serde_json::to_string_pretty(&nb).unwrap())
    }

    pub fn read(&self, rel: impl AsRef<Path>) -> Vec<u8> {
        std::fs::read(self.root.join(rel)).unwrap()
    }
}

impl Drop for TempTree {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

/// Base64 of a `width` x `height` PNG with a deterministic gradient.
pub(crate) fn png_base64(width: u32, height: u32) -> String {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 7 % 256) as u8, (y * 13 % 256) as u8, 90, 255])
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    STANDARD.encode(buf.into_inner())
}

/// A `display_data` output embedding `png` (base64).
pub(crate) fn image_output(png: &str) -> serde_json::Value {
    serde_json::json!({
        "output_type": "display_data",
        "data": {
            "image/png": png,
            "text/plain": ["<Figure Size: (640 x 480)>"]
        },
        "metadata": {}
    })
}
