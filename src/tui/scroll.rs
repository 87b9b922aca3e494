// Vertical page scrolling for the terminal host
//
// Offsets are in terminal rows. The page converts them to document pixels
// for the intersection observers (see `CELL_HEIGHT_PX`).

/// Scroll position over `total` rows seen through `viewport` rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollState {
    offset: usize,
    total: usize,
    viewport: usize,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update content and viewport sizes; the offset is clamped
    pub fn update_dimensions(&mut self, total: usize, viewport: usize) {
        self.total = total;
        self.viewport = viewport;
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.offset = self.offset.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.offset = (self.offset + rows).min(self.max_offset());
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.viewport.max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.viewport.max(1));
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Jump so `row` is the first visible row (clamped)
    pub fn scroll_to(&mut self, row: usize) {
        self.offset = row.min(self.max_offset());
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Visible rows as (start, end)
    pub fn visible_range(&self) -> (usize, usize) {
        let end = (self.offset + self.viewport).min(self.total);
        (self.offset, end)
    }

    pub fn needs_scrollbar(&self) -> bool {
        self.total > self.viewport
    }

    /// 0.0 at the top, 1.0 at the bottom
    pub fn scrollbar_position(&self) -> f64 {
        if self.max_offset() == 0 {
            0.0
        } else {
            self.offset as f64 / self.max_offset() as f64
        }
    }

    /// Furthest the offset can go
    pub fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.viewport)
    }
}
