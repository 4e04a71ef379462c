//! Page geometry in millimetres, measured from the top-left corner of the page.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::LayoutError;

/// Paper sizes accepted on the command line and in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PageSize {
    A3,
    A4,
    A5,
    Letter,
    Legal,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown page size {given:?}; valid sizes are A3, A4, A5, Legal, Letter")]
pub struct ParsePageSizeError {
    pub given: String,
}

impl PageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageSize::A3 => "A3",
            PageSize::A4 => "A4",
            PageSize::A5 => "A5",
            PageSize::Letter => "Letter",
            PageSize::Legal => "Legal",
        }
    }

    /// Width and height in millimetres, portrait.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A3 => (297.0, 420.0),
            PageSize::A4 => (210.0, 297.0),
            PageSize::A5 => (148.0, 210.0),
            PageSize::Letter => (215.9, 279.4),
            PageSize::Legal => (215.9, 355.6),
        }
    }

    /// Footer font size in points.
    pub fn font_size(&self) -> f64 {
        match self {
            PageSize::A3 => 11.0,
            PageSize::A5 => 7.0,
            PageSize::Letter | PageSize::Legal => 10.0,
            PageSize::A4 => 9.0,
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::Letter
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageSize {
    type Err = ParsePageSizeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "a3" => Ok(PageSize::A3),
            "a4" => Ok(PageSize::A4),
            "a5" => Ok(PageSize::A5),
            "letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            _ => Err(ParsePageSizeError {
                given: value.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for PageSize {
    type Error = ParsePageSizeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PageSize> for String {
    fn from(value: PageSize) -> Self {
        value.as_str().to_string()
    }
}

/// Blank space kept free around the grid. The bottom margin is larger so the
/// footer has room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 10.0,
            top: 10.0,
            right: 10.0,
            bottom: 20.0,
        }
    }
}

/// Read-only geometry for one document. Construction validates everything the
/// grid engine relies on, so a `LayoutConfig` can always be laid out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    page_width: f64,
    page_height: f64,
    margins: Margins,
    columns_per_row: usize,
}

impl LayoutConfig {
    pub fn new(
        page_width: f64,
        page_height: f64,
        margins: Margins,
        columns_per_row: usize,
    ) -> Result<Self, LayoutError> {
        if columns_per_row < 1 {
            return Err(LayoutError::ZeroColumns);
        }
        if !(page_width.is_finite() && page_width > 0.0 && page_height.is_finite() && page_height > 0.0) {
            return Err(LayoutError::InvalidPage {
                width: page_width,
                height: page_height,
            });
        }
        let sides = [margins.left, margins.top, margins.right, margins.bottom];
        if sides.iter().any(|m| !m.is_finite() || *m < 0.0) {
            return Err(LayoutError::NoContentArea);
        }

        let config = Self {
            page_width,
            page_height,
            margins,
            columns_per_row,
        };
        if config.content_width() <= 0.0 || config.content_height() <= 0.0 {
            return Err(LayoutError::NoContentArea);
        }
        if config.cell_width() > config.content_height() {
            return Err(LayoutError::CellTooTall {
                cell: config.cell_width(),
                content_height: config.content_height(),
            });
        }
        Ok(config)
    }

    /// Geometry for a named paper size with the default margins.
    pub fn for_page_size(size: PageSize, columns_per_row: usize) -> Result<Self, LayoutError> {
        let (width, height) = size.dimensions();
        Self::new(width, height, Margins::default(), columns_per_row)
    }

    pub fn page_width(&self) -> f64 {
        self.page_width
    }

    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    pub fn columns_per_row(&self) -> usize {
        self.columns_per_row
    }

    pub fn content_left(&self) -> f64 {
        self.margins.left
    }

    pub fn content_top(&self) -> f64 {
        self.margins.top
    }

    pub fn content_bottom(&self) -> f64 {
        self.page_height - self.margins.bottom
    }

    pub fn content_width(&self) -> f64 {
        self.page_width - self.margins.left - self.margins.right
    }

    pub fn content_height(&self) -> f64 {
        self.content_bottom() - self.margins.top
    }

    /// Side of every square cell.
    pub fn cell_width(&self) -> f64 {
        self.content_width() / self.columns_per_row as f64
    }

    /// Whole rows that fit on one page.
    pub fn rows_per_page(&self) -> usize {
        ((self.content_height() + super::EPSILON) / self.cell_width()).floor() as usize
    }
}
