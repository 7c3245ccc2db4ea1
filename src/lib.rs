//! # Anicla dataset preparation
//!
//! Tools for preparing an image classification dataset laid out as one
//! directory per class.
//!
//! ## Modules
//!
//! - `core`: splitting, augmentation and class counting
//! - `charts`: chart model and SVG output
//! - `ui`: optional egui window showing the charts
//! - `config`: JSON configuration with per-field defaults
//! - `logging`: bracketed tracing output to stdout and an optional log file
//! - `cli`: the `anicla-dataset-prep` command line

pub mod charts;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod ui;
