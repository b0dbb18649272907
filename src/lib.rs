//! # Hanzi Sheet - Stroke-Order Practice Worksheets
//!
//! Hanzi Sheet renders printable Chinese handwriting worksheets. For each
//! character of the input it fetches stroke-order outlines and pinyin /
//! meaning annotations, then lays out a row of practice cells:
//!
//! - **Reference**: the complete character
//! - **Decomposition**: one cell per stroke, the newest stroke highlighted
//! - **Trace**: a faint outline to write over
//! - **Practice**: blank cells
//!
//! Cells use a tian-zi-ge (田字格), mi-zi-ge (米字格) or blank grid.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use hanzi_sheet::{
//!     config::{GridStyle, WorksheetConfig},
//!     provider::{CdnStrokes, PlaceholderAnnotations, http_client},
//!     worksheet::{Generator, render_html},
//! };
//!
//! # async fn example() -> Result<(), hanzi_sheet::SheetError> {
//! let generator = Generator::new(
//!     Arc::new(CdnStrokes::new(http_client()?)?),
//!     Arc::new(PlaceholderAnnotations),
//! );
//!
//! let worksheet = generator.generate("学而时习之").await;
//!
//! let config = WorksheetConfig {
//!     grid_style: GridStyle::Tian,
//!     ..Default::default()
//! };
//! std::fs::write("worksheet.html", render_html(&worksheet, &config))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Worksheet configuration and page geometry |
//! | [`hanzi`] | Input filtering and deduplication |
//! | [`stroke`] | Stroke data and reveal modes |
//! | [`components`] | SVG grid cells |
//! | [`compose`] | Per-character row layout |
//! | [`provider`] | Stroke-data and annotation sources |
//! | [`worksheet`] | Generation session and HTML export |
//! | [`server`] | HTTP interface |
//! | [`error`] | Error types |

pub mod components;
pub mod compose;
pub mod config;
pub mod error;
pub mod hanzi;
pub mod provider;
pub mod server;
pub mod stroke;
pub mod worksheet;

// Re-exports for convenience
pub use config::WorksheetConfig;
pub use error::SheetError;
pub use worksheet::{Generator, Worksheet};
