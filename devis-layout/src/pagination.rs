//! The page cursor: places table rows top to bottom and turns pages.

use pdf_surface::{BuiltinFont, Color, DrawingSurface, TextStyle};
use tracing::{debug, info, trace};

use crate::config::{Alignment, LayoutConfig};
use crate::error::{LayoutError, Result};
use crate::footer::FooterLog;
use crate::row::WrappedRow;

/// Where the cursor stands relative to the item table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// No table started yet.
    Idle,
    /// Header drawn, no row below it on this page yet.
    AtTableTop,
    InTable,
    /// Between closing one page and reopening the table on the next.
    PageBreakPending,
    /// Table finished; only free blocks may follow.
    Closed,
}

/// Geometry of the page being laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    /// Top of the next block, in points from the page bottom.
    pub cursor_y: f64,
    pub page_index: usize,
    pub table_top_y: f64,
    /// Column left edges followed by the table's right edge.
    pub column_x_positions: Vec<f64>,
}

/// Owns the drawing surface for the duration of one document.
pub struct PageCursor<'a, S: DrawingSurface> {
    surface: S,
    config: &'a LayoutConfig,
    page: PageState,
    state: CursorState,
    rows_placed: usize,
    doc_number: String,
    footers: FooterLog,
}

impl<'a, S: DrawingSurface> PageCursor<'a, S> {
    /// Start at the top of the surface's current page.
    pub fn new(surface: S, config: &'a LayoutConfig, doc_number: &str) -> Self {
        let page = PageState {
            cursor_y: config.first_page_top,
            page_index: surface.current_page(),
            table_top_y: config.first_page_top,
            column_x_positions: config.column_edges(),
        };
        PageCursor {
            surface,
            config,
            page,
            state: CursorState::Idle,
            rows_placed: 0,
            doc_number: doc_number.to_string(),
            footers: FooterLog::new(),
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn page(&self) -> &PageState {
        &self.page
    }

    pub fn cursor_y(&self) -> f64 {
        self.page.cursor_y
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Move the cursor down by `dy` points. The cursor only moves down the
    /// page: a negative `dy` leaves it where it is.
    pub fn advance(&mut self, dy: f64) {
        self.page.cursor_y -= dy.max(0.0);
    }

    /// Draw the table header with its top edge at `top_y`, which must not
    /// lie above the cursor.
    pub fn begin_table(&mut self, top_y: f64) -> Result<()> {
        if self.state != CursorState::Idle {
            return Err(LayoutError::malformed("table already started"));
        }
        if top_y > self.page.cursor_y {
            return Err(LayoutError::malformed(format!(
                "table top {} lies above the cursor at {}",
                top_y, self.page.cursor_y
            )));
        }
        self.page.cursor_y = top_y;
        self.open_table()?;
        debug!(page = self.page.page_index, top_y = self.page.table_top_y, "table started");
        Ok(())
    }

    /// Place `row` below the previous one, turning the page first if it
    /// does not fit. A row is never split across pages.
    pub fn place_row(&mut self, row: &WrappedRow) -> Result<()> {
        if !matches!(self.state, CursorState::AtTableTop | CursorState::InTable) {
            return Err(LayoutError::malformed(format!(
                "row placed while the table is {:?}",
                self.state
            )));
        }
        let index = self.rows_placed;
        if !self.fits(row.height) {
            let available = self.config.continuation_row_capacity();
            if row.height > available {
                return Err(LayoutError::UnrepresentableRow {
                    index,
                    height: row.height,
                    available,
                });
            }
            self.break_page()?;
        }

        trace!(index, page = self.page.page_index, y = self.page.cursor_y, height = row.height, "row");
        self.draw_row(row)?;
        self.page.cursor_y -= row.height;
        self.rows_placed += 1;
        self.state = CursorState::InTable;
        Ok(())
    }

    /// Close the table's borders on the current page.
    pub fn end_table(&mut self) -> Result<()> {
        if !matches!(self.state, CursorState::AtTableTop | CursorState::InTable) {
            return Err(LayoutError::malformed("no open table to end"));
        }
        self.close_borders();
        self.state = CursorState::Closed;
        debug!(rows = self.rows_placed, page = self.page.page_index, "table closed");
        Ok(())
    }

    /// Make sure a block of `height` fits below the cursor, starting a new
    /// page if it does not. Returns whether a page was started.
    ///
    /// A block taller than a whole continuation page is rejected, since no
    /// page could hold it above the bottom margin.
    pub fn ensure_space(&mut self, height: f64) -> Result<bool> {
        if matches!(self.state, CursorState::AtTableTop | CursorState::InTable) {
            return Err(LayoutError::malformed("ensure_space called inside the table"));
        }
        let page_capacity = self.block_capacity();
        if height > page_capacity {
            return Err(LayoutError::malformed(format!(
                "block of {}pt does not fit on a page ({}pt available)",
                height, page_capacity
            )));
        }
        if self.fits(height) {
            return Ok(false);
        }
        self.next_page();
        self.page.cursor_y = self.config.continuation_top;
        debug!(page = self.page.page_index, height, "block moved to a new page");
        Ok(true)
    }

    /// Stamp the footers and serialize the document.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        if matches!(self.state, CursorState::AtTableTop | CursorState::InTable) {
            self.end_table()?;
        }
        self.footers
            .capture(&self.doc_number, &self.config.footer_left_text, self.page.page_index);
        let pages = self.footers.finalize(&mut self.surface, self.config)?;
        let bytes = self.surface.finalize_and_emit()?;
        info!(doc_number = %self.doc_number, pages, bytes = bytes.len(), "document rendered");
        Ok(bytes)
    }

    /// Height available to a free block on a fresh continuation page.
    pub fn block_capacity(&self) -> f64 {
        self.config.continuation_top - self.config.min_bottom_margin
    }

    fn fits(&self, height: f64) -> bool {
        self.page.cursor_y - height >= self.config.min_bottom_margin
    }

    fn next_page(&mut self) {
        self.footers
            .capture(&self.doc_number, &self.config.footer_left_text, self.page.page_index);
        self.surface.start_new_page();
        self.page.page_index = self.surface.current_page();
        self.page.column_x_positions = self.config.column_edges();
    }

    fn break_page(&mut self) -> Result<()> {
        self.state = CursorState::PageBreakPending;
        self.close_borders();
        self.next_page();
        self.page.cursor_y = self.config.continuation_top;
        debug!(page = self.page.page_index, rows = self.rows_placed, "page break");
        self.open_table()
    }

    /// Draw the header band at the cursor and move below it.
    fn open_table(&mut self) -> Result<()> {
        let config = self.config;
        let top = self.page.cursor_y;
        let bottom = top - config.header_height;
        self.surface.fill_rect(
            config.margin_left,
            bottom,
            config.table_width,
            config.header_height,
            Color::BLACK,
        );

        let size = config.header_font_size;
        let style = TextStyle::bold(size).with_color(Color::WHITE);
        let baseline = top - config.baseline_offset;
        for (i, column) in config.columns.iter().enumerate() {
            let x = self.cell_x(i, column.alignment, &column.label, BuiltinFont::HelveticaBold, size)?;
            self.surface.draw_text(&column.label, x, baseline, &style);
        }

        self.page.table_top_y = top;
        self.page.cursor_y = bottom;
        self.state = CursorState::AtTableTop;
        Ok(())
    }

    fn draw_row(&mut self, row: &WrappedRow) -> Result<()> {
        let config = self.config;
        let top = self.page.cursor_y;
        let size = config.font_size;
        let style = TextStyle::regular(size);
        let first_baseline = top - config.baseline_offset;

        for (i, column) in config.columns.iter().enumerate() {
            match row.cells.text_for(column.role) {
                None => {
                    let x = self.page.column_x_positions[i] + config.cell_padding;
                    for (n, line) in row.lines.iter().enumerate() {
                        let y = first_baseline - n as f64 * config.continuation_line_height;
                        self.surface.draw_text(line, x, y, &style);
                    }
                }
                Some(text) => {
                    let x = self.cell_x(i, column.alignment, text, BuiltinFont::Helvetica, size)?;
                    self.surface.draw_text(text, x, first_baseline, &style);
                }
            }
        }

        let bottom = top - row.height;
        self.surface
            .draw_line(config.margin_left, bottom, config.table_right(), bottom);
        Ok(())
    }

    /// x of a cell's text start for the given alignment.
    fn cell_x(
        &self,
        column: usize,
        alignment: Alignment,
        text: &str,
        font: BuiltinFont,
        size: f64,
    ) -> Result<f64> {
        let edges = &self.page.column_x_positions;
        let padding = self.config.cell_padding;
        match alignment {
            Alignment::Left => Ok(edges[column] + padding),
            Alignment::Right => {
                let width = self
                    .surface
                    .measure_text(text, font, size)
                    .map_err(LayoutError::MeasurementUnavailable)?;
                Ok(edges[column + 1] - padding - width)
            }
        }
    }

    /// Vertical separators at every column edge and the bottom border.
    fn close_borders(&mut self) {
        let top = self.page.table_top_y;
        let bottom = self.page.cursor_y;
        for &x in &self.page.column_x_positions {
            self.surface.draw_line(x, top, x, bottom);
        }
        self.surface
            .draw_line(self.config.margin_left, bottom, self.config.table_right(), bottom);
    }
}
