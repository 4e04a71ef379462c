//! Grid placement of QR code images across pages. Only geometry lives here;
//! pixels and PDF drawing belong to the renderer.

pub mod grid;
pub mod page;

use thiserror::Error;

pub use grid::{layout, Cell, Layout, LayoutState};
pub use page::{LayoutConfig, Margins, PageSize};

/// Tolerance for comparing accumulated millimetre positions.
pub(crate) const EPSILON: f64 = 1e-9;

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("codes per row must be >= 1")]
    ZeroColumns,
    #[error("page dimensions must be positive, got {width}x{height} mm")]
    InvalidPage { width: f64, height: f64 },
    #[error("margins leave no room for content")]
    NoContentArea,
    #[error("a {cell:.1} mm code does not fit in {content_height:.1} mm of page content; use more codes per row")]
    CellTooTall { cell: f64, content_height: f64 },
}
