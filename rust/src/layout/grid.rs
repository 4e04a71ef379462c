//! Row-major grid placement. Images fill a row left to right, rows fill a page
//! top to bottom, and a new page starts only at a row boundary. Placement is a
//! fold over the image sequence: each step takes the previous cursor state and
//! returns the next state together with the emitted cell.

use super::page::LayoutConfig;
use super::EPSILON;

/// Where one image lands. Coordinates are millimetres from the page's top-left
/// corner; height is left to the renderer, which scales the image to `width`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub index: usize,
    /// 1-based page number.
    pub page: usize,
    /// Row within the page, 0-based.
    pub row: usize,
    pub column: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

/// Cursor carried between placements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutState {
    page: usize,
    row: usize,
    column: usize,
}

impl LayoutState {
    pub fn initial() -> Self {
        Self {
            page: 1,
            row: 0,
            column: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Places image `index` and advances the cursor.
    pub fn place(self, index: usize, config: &LayoutConfig) -> (Self, Cell) {
        let width = config.cell_width();
        let mut next = self;

        if next.column == config.columns_per_row() {
            next.column = 0;
            next.row += 1;
        }

        // Rows are square, so the cell width doubles as the row height.
        let bottom = config.content_top() + (next.row + 1) as f64 * width;
        if bottom > config.content_bottom() + EPSILON {
            next.page += 1;
            next.row = 0;
            next.column = 0;
        }

        let cell = Cell {
            index,
            page: next.page,
            row: next.row,
            column: next.column,
            x: config.content_left() + next.column as f64 * width,
            y: config.content_top() + next.row as f64 * width,
            width,
        };
        next.column += 1;
        (next, cell)
    }
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::initial()
    }
}

/// All cells of a document plus its page count.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub cells: Vec<Cell>,
    pub pages: usize,
}

impl Layout {
    pub fn cells_on_page(&self, page: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().filter(move |cell| cell.page == page)
    }
}

/// Lays out `image_count` images. An empty sequence still yields one page.
pub fn layout(image_count: usize, config: &LayoutConfig) -> Layout {
    let mut state = LayoutState::initial();
    let mut cells = Vec::with_capacity(image_count);
    for index in 0..image_count {
        let (next, cell) = state.place(index, config);
        cells.push(cell);
        state = next;
    }
    Layout {
        cells,
        pages: state.page(),
    }
}
