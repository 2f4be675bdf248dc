// src/discover/mod.rs
// =============================================================================
// This module finds the Markdown files to check.
//
// Input paths can be directories (walked recursively) or single files.
// The result is de-duplicated and sorted so every run checks files in the
// same order.
// =============================================================================

mod walk;

// Re-export the main function from walk.rs
pub use walk::collect_markdown_files;
