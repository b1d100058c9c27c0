//! Terminal content-type filter: classify text content as Markdown, a
//! recognizable code/data format, or plain text, render it accordingly,
//! and hand the result to a pager.

pub mod classifier;
pub mod cli;
pub mod pager;
pub mod render;
