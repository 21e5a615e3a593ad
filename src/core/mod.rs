//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Shared vocabulary (characteristics, include kinds) and the result model
//! - Rendering functions for different output formats
//! - Include-name and path helpers
//! - Hashing

pub mod model;
pub mod paths;
pub mod render;
pub mod util;
