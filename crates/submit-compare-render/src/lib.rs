//! submit-compare-render: HTML views and static assets.
//!
//! Implements the block's `ViewRenderer` port with plain string building and
//! ships the CSS/JS the views reference.

pub mod assets;
pub mod html;

pub use html::{html_escape, render_page, HtmlRenderer};
