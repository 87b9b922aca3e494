// Host application state
//
// Owns the page and everything the terminal needs around it: scroll
// position, the hit map from the last frame, track motion, the log strip
// and the error overlay. Input handlers turn terminal events into page
// events; nothing here changes the document directly.

use super::animation::TrackMotion;
use super::scroll::ScrollState;
use super::{CELL_HEIGHT_PX, CELL_WIDTH_PX};
use crate::diagnostics::{DiagnosticOverlay, ErrorReport};
use crate::dom::{DomEvent, ElementId, Key, KeyboardEvent};
use crate::i18n::Language;
use crate::logging::LogBuffer;
use crate::page::Page;
use ratatui::layout::{Position, Rect};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

/// Clickable screen regions from the last frame; later entries sit on top
#[derive(Debug, Default, Clone)]
pub struct HitMap {
    regions: Vec<(Rect, ElementId)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn push(&mut self, area: Rect, target: ElementId) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, target));
        }
    }

    pub fn target_at(&self, column: u16, row: u16) -> Option<ElementId> {
        let position = Position::new(column, row);
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| area.contains(position))
            .map(|(_, target)| *target)
    }
}

/// Pointer pressed but not yet released
#[derive(Debug, Clone, Copy)]
struct Press {
    target: ElementId,
    column: u16,
}

pub struct App {
    pub page: Page,
    pub scroll: ScrollState,
    pub overlay: DiagnosticOverlay,
    pub logs: LogBuffer,
    pub hits: HitMap,
    pub motion: TrackMotion,
    pub show_logs: bool,
    pub should_quit: bool,
    /// Body area from the last frame
    body: Rect,
    section_rows: Vec<usize>,
    last_focus: Option<ElementId>,
    press: Option<Press>,
}

impl App {
    pub fn new(page: Page, overlay: DiagnosticOverlay, logs: LogBuffer) -> Self {
        Self {
            page,
            scroll: ScrollState::new(),
            overlay,
            logs,
            hits: HitMap::default(),
            motion: TrackMotion::new(Instant::now()),
            show_logs: false,
            should_quit: false,
            body: Rect::default(),
            section_rows: Vec::new(),
            last_focus: None,
            press: None,
        }
    }

    pub fn body(&self) -> Rect {
        self.body
    }

    /// Deliver an event to the page; a panic is reported, not fatal
    pub fn dispatch(&mut self, event: DomEvent) {
        let page = &mut self.page;
        let result = catch_unwind(AssertUnwindSafe(|| page.dispatch(event)));
        if result.is_err() && !self.overlay.is_showing() {
            // Hook not installed (tests, library use)
            self.overlay
                .report(ErrorReport::here("page event handler panicked"));
        }
        self.follow_document_scroll();
    }

    pub fn click(&mut self, target: ElementId) {
        self.dispatch(DomEvent::Click(target));
    }

    pub fn key(&mut self, key: Key, shift: bool) {
        let event = if shift {
            KeyboardEvent::with_shift(key)
        } else {
            KeyboardEvent::new(key)
        };
        self.dispatch(DomEvent::KeyDown(event));
    }

    pub fn previous_slide(&mut self) {
        if let Some((prev, _)) = self.page.carousel().buttons() {
            self.click(prev);
        }
    }

    pub fn next_slide(&mut self) {
        if let Some((_, next)) = self.page.carousel().buttons() {
            self.click(next);
        }
    }

    pub fn toggle_menu(&mut self) {
        if let Some(toggle) = self.page.menu().toggle_button() {
            self.click(toggle);
        }
    }

    /// Click the button of the language not currently shown
    pub fn switch_language(&mut self) {
        let other = match self.page.language() {
            Language::Pt => Language::En,
            Language::En => Language::Pt,
        };
        let selector = format!(".lang-btn[data-lang=\"{}\"]", other.code());
        match self.page.document().query(&selector) {
            Some(button) => self.click(button),
            None => self.page.set_language(other),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Scrolling
    // ─────────────────────────────────────────────────────────────────────

    pub fn scroll_rows(&mut self, delta: isize) {
        if self.page.scroll_locked() {
            return;
        }
        let row = self.scroll.offset().saturating_add_signed(delta);
        self.set_scroll_row(row);
    }

    pub fn page_up(&mut self) {
        if self.page.scroll_locked() {
            return;
        }
        self.scroll.page_up();
        self.publish_scroll();
    }

    pub fn page_down(&mut self) {
        if self.page.scroll_locked() {
            return;
        }
        self.scroll.page_down();
        self.publish_scroll();
    }

    pub fn scroll_to_top(&mut self) {
        if self.page.scroll_locked() {
            return;
        }
        self.set_scroll_row(0);
    }

    pub fn scroll_to_bottom(&mut self) {
        if self.page.scroll_locked() {
            return;
        }
        self.scroll.scroll_to_bottom();
        self.publish_scroll();
    }

    fn set_scroll_row(&mut self, row: usize) {
        self.scroll.scroll_to(row);
        self.publish_scroll();
    }

    /// Tell the page where the viewport is, if it doesn't know yet
    fn publish_scroll(&mut self) {
        let y = self.scroll.offset() as f64 * CELL_HEIGHT_PX;
        if self.page.document().viewport().scroll_y != y {
            let page = &mut self.page;
            let result = catch_unwind(AssertUnwindSafe(|| page.dispatch(DomEvent::Scroll { y })));
            if result.is_err() && !self.overlay.is_showing() {
                self.overlay
                    .report(ErrorReport::here("scroll handler panicked"));
            }
        }
    }

    /// The page may scroll itself (anchor links); mirror that in rows
    fn follow_document_scroll(&mut self) {
        let y = self.page.document().viewport().scroll_y;
        let row = (y / CELL_HEIGHT_PX).round() as usize;
        if row != self.scroll.offset() {
            self.set_scroll_row(row);
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Frame synchronisation (called while drawing)
    // ─────────────────────────────────────────────────────────────────────

    /// Resize the page viewport when the body area changes
    pub fn sync_viewport(&mut self, body: Rect) {
        if body.width == self.body.width && body.height == self.body.height {
            self.body = body;
            return;
        }
        self.body = body;
        // Resize restacks at viewport height; measured heights must be re-sent
        self.section_rows.clear();
        self.dispatch(DomEvent::Resize {
            width: f64::from(body.width) * CELL_WIDTH_PX,
            height: f64::from(body.height) * CELL_HEIGHT_PX,
        });
    }

    /// Feed measured section heights (rows) back into the document layout
    pub fn sync_layout(&mut self, section_rows: Vec<usize>, total_rows: usize) {
        self.scroll
            .update_dimensions(total_rows, usize::from(self.body.height));
        if section_rows != self.section_rows {
            let heights: Vec<f64> = section_rows
                .iter()
                .map(|rows| *rows as f64 * CELL_HEIGHT_PX)
                .collect();
            self.page.relayout(&heights);
            self.section_rows = section_rows;
        }
        self.publish_scroll();
    }

    /// Keep a newly focused element on screen
    pub fn follow_focus(&mut self, element_rows: &[(ElementId, usize)]) {
        let focus = self.page.document().active_element();
        if focus == self.last_focus {
            return;
        }
        self.last_focus = focus;
        let Some(row) = focus.and_then(|f| {
            element_rows
                .iter()
                .find(|(id, _)| *id == f)
                .map(|(_, row)| *row)
        }) else {
            return;
        };
        if self.page.scroll_locked() {
            return;
        }
        let (start, end) = self.scroll.visible_range();
        if row < start || row >= end {
            let height = usize::from(self.body.height);
            self.set_scroll_row(row.saturating_sub(height / 3));
        }
    }

    pub fn sync_motion(&mut self, now: Instant) {
        let doc = self.page.document();
        let track = doc.query(".slider-track");
        let transform = track.and_then(|t| doc.style(t, "transform"));
        let transition = track.and_then(|t| doc.style(t, "transition"));
        self.motion.sync(transform, transition, now);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Pointer
    // ─────────────────────────────────────────────────────────────────────

    fn document_x(&self, column: u16) -> f64 {
        f64::from(column.saturating_sub(self.body.x)) * CELL_WIDTH_PX
    }

    /// Button down: starts a touch on whatever is under the pointer
    pub fn mouse_down(&mut self, column: u16, row: u16) {
        let Some(target) = self.hits.target_at(column, row) else {
            self.press = None;
            return;
        };
        self.press = Some(Press { target, column });
        let x = self.document_x(column);
        self.dispatch(DomEvent::TouchStart { target, x });
    }

    /// Button up: ends the touch; without horizontal travel it is a click
    pub fn mouse_up(&mut self, column: u16, row: u16) {
        let Some(press) = self.press.take() else {
            return;
        };
        let x = self.document_x(column);
        self.dispatch(DomEvent::TouchEnd {
            target: press.target,
            x,
        });
        if column == press.column && self.hits.target_at(column, row) == Some(press.target) {
            self.click(press.target);
        }
    }
}
