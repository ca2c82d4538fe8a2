//! Everything the pipeline writes to disk.
//!
//! - [`history`]: the `articles.json` log of published articles
//! - [`markdown`]: local Markdown copies of generated articles
//!
//! # Output Structure
//!
//! ```text
//! articles.json                      # publish history
//! generated/
//! └── Borrow-Checker-A-Field-Guide.md
//! ```

pub mod history;
pub mod markdown;
