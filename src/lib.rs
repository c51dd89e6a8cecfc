//! Inkcard - poster and card composer
//!
//! Scenes of images and text boxes are edited over HTTP, rendered through
//! SVG and exported as JPEG, optionally grayscale and Floyd-Steinberg
//! dithered. This library exposes modules for integration testing.

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
