// Page rendering for the terminal host
//
// The document is flattened into rows: a fixed header, then every section
// in order, with the carousel drawn as a filmstrip. Each interactive element
// that lands on screen leaves a hit region so pointer input maps back to it.

use super::app::{App, HitMap};
use super::scroll::ScrollState;
use super::CELL_WIDTH_PX;
use crate::carousel::{CarouselController, SLIDER_ID};
use crate::diagnostics::ErrorReport;
use crate::dom::{Document, ElementId};
use crate::logging::{LogBuffer, LogEntry, LogLevel};
use crate::observer::RevealObserver;
use crate::page::plain_text;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
    },
    Frame,
};
use std::time::Instant;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ACCENT: Color = Color::Cyan;
const MUTED: Color = Color::DarkGray;
const HIGHLIGHT: Color = Color::Yellow;
const ERROR: Color = Color::Red;

const LOG_STRIP_HEIGHT: u16 = 6;
const SLIDE_ROWS: usize = 5;
const MENU_WIDTH: u16 = 32;
const MARGIN: u16 = 2;

// ═══════════════════════════════════════════════════════════════════════════
// Rows
// ═══════════════════════════════════════════════════════════════════════════

/// One rendered line plus the element targets along it
#[derive(Debug, Default, Clone)]
pub struct Row {
    spans: Vec<Span<'static>>,
    hits: Vec<(u16, u16, ElementId)>,
    width: u16,
}

impl Row {
    fn push(&mut self, text: impl Into<String>, style: Style) {
        let text = text.into();
        self.width = self.width.saturating_add(text.width() as u16);
        self.spans.push(Span::styled(text, style));
    }

    fn push_hit(&mut self, text: impl Into<String>, style: Style, target: ElementId) {
        let start = self.width;
        self.push(text, style);
        self.hits.push((start, self.width, target));
    }

    fn append(&mut self, other: Row) {
        let shift = self.width;
        self.hits.extend(
            other
                .hits
                .into_iter()
                .map(|(start, end, target)| (start + shift, end + shift, target)),
        );
        self.spans.extend(other.spans);
        self.width = self.width.saturating_add(other.width);
    }

    fn centered(self, width: u16) -> Self {
        let mut row = Row::default();
        row.push(
            " ".repeat(usize::from(width.saturating_sub(self.width) / 2)),
            Style::default(),
        );
        row.append(self);
        row
    }

    /// Whole-row target underneath the existing ones
    fn with_backdrop(mut self, width: u16, target: Option<ElementId>) -> Self {
        if let Some(target) = target {
            self.hits.insert(0, (0, width, target));
        }
        self
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    pub fn target_at(&self, column: u16) -> Option<ElementId> {
        self.hits
            .iter()
            .rev()
            .find(|(start, end, _)| column >= *start && column < *end)
            .map(|(_, _, target)| *target)
    }

    fn render(&self, f: &mut Frame, area: Rect, hits: &mut HitMap) {
        f.render_widget(Paragraph::new(Line::from(self.spans.clone())), area);
        push_hits(hits, area, &self.hits);
    }
}

fn push_hits(hits: &mut HitMap, area: Rect, ranges: &[(u16, u16, ElementId)]) {
    for &(start, end, target) in ranges {
        if start >= area.width {
            continue;
        }
        let width = end.min(area.width) - start;
        hits.push(Rect::new(area.x + start, area.y, width, 1), target);
    }
}

/// Where the carousel track is drawn this frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackView {
    pub position_px: f64,
    pub animating: bool,
}

/// The scrollable part of the page, flattened
#[derive(Debug, Default)]
pub struct BodyModel {
    pub rows: Vec<Row>,
    /// Rows taken by each `main section`, in order
    pub section_rows: Vec<usize>,
    /// Row of each focusable element drawn in the body
    pub element_rows: Vec<(ElementId, usize)>,
}

fn focus_style(doc: &Document, id: ElementId, style: Style) -> Style {
    if doc.active_element() == Some(id) {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    }
}

fn faded(style: Style, visible: bool) -> Style {
    if visible {
        style
    } else {
        style.fg(MUTED)
    }
}

pub fn body_model(
    doc: &Document,
    carousel: &CarouselController,
    track: TrackView,
    width: u16,
) -> BodyModel {
    let mut model = BodyModel::default();
    let muted = Style::default().fg(MUTED);

    for section in doc.query_all("main section") {
        let start = model.rows.len();
        let visible = doc.has_class(section, RevealObserver::VISIBLE_CLASS);

        let label = format!("── {} ", doc.attribute(section, "id").unwrap_or_default());
        let mut rule = Row::default();
        let fill = usize::from(width).saturating_sub(label.width());
        rule.push(label, muted);
        rule.push("─".repeat(fill), muted);
        model.rows.push(rule);
        model.rows.push(Row::default());

        for &child in doc.element(section).children() {
            let element = doc.element(child);
            match element.tag() {
                "h1" => text_block(
                    &mut model.rows,
                    element.text(),
                    faded(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD), visible),
                    width,
                ),
                "h2" => text_block(
                    &mut model.rows,
                    element.text(),
                    faded(Style::default().add_modifier(Modifier::BOLD), visible),
                    width,
                ),
                "p" => text_block(
                    &mut model.rows,
                    element.text(),
                    faded(Style::default(), visible),
                    width,
                ),
                "div" if element.id() == Some(SLIDER_ID) => {
                    carousel_rows(&mut model, doc, carousel, child, track, width, visible)
                }
                _ => continue,
            }
            model.rows.push(Row::default());
        }
        model.section_rows.push(model.rows.len() - start);
    }
    model
}

fn text_block(rows: &mut Vec<Row>, markup: &str, style: Style, width: u16) {
    let content_width = usize::from(width.saturating_sub(2 * MARGIN));
    for line in wrap(&plain_text(markup), content_width) {
        let mut row = Row::default();
        row.push(" ".repeat(usize::from(MARGIN)), Style::default());
        row.push(line, style);
        rows.push(row);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Carousel
// ═══════════════════════════════════════════════════════════════════════════

struct SlideFace {
    alt: String,
    caption: String,
    link: Option<(ElementId, String)>,
}

impl SlideFace {
    fn read(doc: &Document, slide: ElementId) -> Self {
        let alt = doc
            .query_within(slide, "img")
            .and_then(|img| doc.attribute(img, "alt"))
            .unwrap_or_default()
            .to_string();
        let caption = doc
            .query_within(slide, "p")
            .map(|p| plain_text(doc.text(p)))
            .unwrap_or_default();
        let link = doc
            .query_within(slide, "a")
            .map(|a| (a, plain_text(doc.text(a))));
        Self { alt, caption, link }
    }

    fn lines(&self) -> [String; SLIDE_ROWS] {
        [
            String::new(),
            format!("▣ {}", self.alt),
            self.caption.clone(),
            self.link
                .as_ref()
                .map(|(_, label)| format!("[ {} ]", label))
                .unwrap_or_default(),
            String::new(),
        ]
    }
}

fn carousel_rows(
    model: &mut BodyModel,
    doc: &Document,
    carousel: &CarouselController,
    slider: ElementId,
    track: TrackView,
    width: u16,
    visible: bool,
) {
    let faces: Vec<SlideFace> = doc
        .query_all_within(slider, ".slider-slide")
        .into_iter()
        .map(|slide| SlideFace::read(doc, slide))
        .collect();
    if faces.is_empty() {
        return;
    }
    let view = doc.query_within(slider, ".slider-main-view");
    let frame = faded(Style::default().fg(ACCENT), visible);

    if track.animating {
        for line in filmstrip(&faces, width, track.position_px) {
            let mut row = Row::default();
            row.push(line, frame);
            model.rows.push(row.with_backdrop(width, view));
        }
    } else {
        let face = &faces[carousel.current_index().min(faces.len() - 1)];
        let lines = face.lines();
        let cols = usize::from(width);
        for (i, line) in lines.iter().enumerate() {
            let mut row = Row::default();
            match (i, &face.link) {
                (3, Some((link, _))) => {
                    let style = focus_style(doc, *link, frame.add_modifier(Modifier::BOLD));
                    row.push_hit(truncate(line, cols), style, *link);
                    model.element_rows.push((*link, model.rows.len()));
                }
                (1, _) => row.push(
                    truncate(line, cols),
                    faded(Style::default().add_modifier(Modifier::ITALIC), visible).fg(MUTED),
                ),
                _ => row.push(truncate(line, cols), faded(Style::default(), visible)),
            }
            model.rows.push(row.centered(width).with_backdrop(width, view));
        }
    }

    let Some((prev, next)) = carousel.buttons() else {
        return;
    };
    let control = model.rows.len();
    let mut row = Row::default();
    row.push_hit(
        format!(" {} ", doc.text(prev)),
        focus_style(doc, prev, frame),
        prev,
    );
    model.element_rows.push((prev, control));
    row.push("  ", Style::default());
    for &dot in carousel.indicator_dots() {
        let (symbol, style) = if doc.has_class(dot, "active") {
            ("●", faded(Style::default().fg(HIGHLIGHT), visible))
        } else {
            ("○", Style::default().fg(MUTED))
        };
        row.push_hit(symbol, focus_style(doc, dot, style), dot);
        row.push(" ", Style::default());
    }
    row.push(" ", Style::default());
    row.push_hit(
        format!(" {} ", doc.text(next)),
        focus_style(doc, next, frame),
        next,
    );
    model.element_rows.push((next, control));
    model.rows.push(row.centered(width));
}

/// Slides laid side by side, `width` columns each, shifted by the track offset
fn filmstrip(faces: &[SlideFace], width: u16, position_px: f64) -> Vec<String> {
    let cols = usize::from(width);
    let shift = (position_px / CELL_WIDTH_PX).round() as i64;
    let lines: Vec<[String; SLIDE_ROWS]> = faces.iter().map(SlideFace::lines).collect();

    (0..SLIDE_ROWS)
        .map(|r| {
            let mut cells = vec![' '; cols];
            for (i, face) in lines.iter().enumerate() {
                let left = i as i64 * cols as i64 + shift;
                let text = center_text(&truncate(&face[r], cols), cols);
                for (k, ch) in text.chars().enumerate() {
                    let col = left + k as i64;
                    if (0..cols as i64).contains(&col) {
                        cells[col as usize] = if ch.width() == Some(1) { ch } else { ' ' };
                    }
                }
            }
            cells.into_iter().collect()
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// Text helpers
// ═══════════════════════════════════════════════════════════════════════════

/// Greedy word wrap by display width; words longer than a line are split
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        let mut used = 0;
        for word in paragraph.split_whitespace() {
            if used > 0 && used + 1 + word.width() > width {
                lines.push(std::mem::take(&mut line));
                used = 0;
            }
            if used > 0 {
                line.push(' ');
                used += 1;
            }
            for ch in word.chars() {
                let w = ch.width().unwrap_or(0);
                if used > 0 && used + w > width {
                    lines.push(std::mem::take(&mut line));
                    used = 0;
                }
                line.push(ch);
                used += w;
            }
        }
        lines.push(line);
    }
    lines
}

/// Cut to `width` display columns, marking the cut with an ellipsis
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn center_text(text: &str, width: usize) -> String {
    let left = width.saturating_sub(text.width()) / 2;
    format!("{}{}", " ".repeat(left), text)
}

/// Helper to create a centered rect of fixed size
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

// ═══════════════════════════════════════════════════════════════════════════
// Frame
// ═══════════════════════════════════════════════════════════════════════════

/// Draw one frame and rebuild the hit map
pub fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let log_height = if app.show_logs { LOG_STRIP_HEIGHT } else { 0 };
    let [header, body, logs, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(log_height),
        Constraint::Length(1),
    ])
    .areas(area);
    // Last column is the scrollbar
    let content = Rect {
        width: body.width.saturating_sub(1),
        ..body
    };

    app.sync_viewport(content);
    let now = Instant::now();
    app.sync_motion(now);
    let track = TrackView {
        position_px: app.motion.position(now),
        animating: app.motion.is_animating(now),
    };
    let model = body_model(
        app.page.document(),
        app.page.carousel(),
        track,
        content.width,
    );
    app.sync_layout(model.section_rows.clone(), model.rows.len());
    app.follow_focus(&model.element_rows);

    let mut hits = HitMap::default();
    let doc = app.page.document();
    render_body(f, content, body, &model, &app.scroll, &mut hits);
    header_row(doc, app.page.menu().is_open(), header.width).render(f, header, &mut hits);
    if app.page.menu().is_open() {
        render_menu(f, body, doc, &mut hits);
    }
    if app.show_logs {
        render_logs(f, logs, &app.logs);
    }
    render_status(f, status, app);
    if let Some(report) = app.overlay.current() {
        render_error(f, area, &report);
    }
    app.hits = hits;
}

fn render_body(
    f: &mut Frame,
    content: Rect,
    body: Rect,
    model: &BodyModel,
    scroll: &ScrollState,
    hits: &mut HitMap,
) {
    let (start, end) = scroll.visible_range();
    let visible = model.rows.get(start..end).unwrap_or_default();
    for (i, row) in visible.iter().enumerate() {
        let line = Rect::new(content.x, content.y + i as u16, content.width, 1);
        row.render(f, line, hits);
    }

    if scroll.needs_scrollbar() {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None);
        let mut state = ScrollbarState::new(scroll.max_offset()).position(scroll.offset());
        f.render_stateful_widget(scrollbar, body, &mut state);
    }
}

/// Menu toggle, inline nav links and language buttons
pub fn header_row(doc: &Document, menu_open: bool, width: u16) -> Row {
    let mut left = Row::default();
    if let Some(toggle) = doc.query(".menu-toggle") {
        let style = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
        left.push_hit(
            format!(" {} ", doc.text(toggle)),
            focus_style(doc, toggle, style),
            toggle,
        );
    }

    let mut right = Row::default();
    for button in doc.query_all(".lang-btn") {
        let style = if doc.has_class(button, "active") {
            Style::default().fg(Color::Black).bg(ACCENT)
        } else {
            Style::default().fg(MUTED)
        };
        right.push(" ", Style::default());
        right.push_hit(
            format!(" {} ", doc.text(button)),
            focus_style(doc, button, style),
            button,
        );
    }

    // Inline links only while the panel is closed and they fit
    if !menu_open {
        let mut links = Row::default();
        for link in doc.query_all("nav ul li a") {
            let style = if doc.has_class(link, "active") {
                Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            links.push(" ", Style::default());
            links.push_hit(
                format!(" {} ", plain_text(doc.text(link))),
                focus_style(doc, link, style),
                link,
            );
        }
        if left.width + links.width + right.width <= width {
            left.append(links);
        }
    }

    let gap = width.saturating_sub(left.width + right.width);
    left.push(" ".repeat(usize::from(gap)), Style::default());
    left.append(right);
    left
}

fn render_menu(f: &mut Frame, body: Rect, doc: &Document, hits: &mut HitMap) {
    if let Some(overlay) = doc.query(".menu-overlay") {
        hits.push(body, overlay);
    }
    let links = doc.query_all("nav ul li a");
    let width = MENU_WIDTH.min(body.width);
    let height = (links.len() as u16 + 2).min(body.height);
    let panel = Rect::new(body.x + body.width - width, body.y, width, height);
    if let Some(nav) = doc.query("nav") {
        hits.push(panel, nav);
    }

    f.render_widget(Clear, panel);
    let title = doc
        .query(".menu-toggle")
        .and_then(|toggle| doc.attribute(toggle, "title"))
        .unwrap_or("Menu");
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(format!(" {} ", title));
    let inner = block.inner(panel);
    f.render_widget(block, panel);

    for (i, link) in links.into_iter().enumerate().take(usize::from(inner.height)) {
        let style = if doc.has_class(link, "active") {
            Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let mut row = Row::default();
        row.push_hit(
            truncate(
                &format!(" {} ", plain_text(doc.text(link))),
                usize::from(inner.width),
            ),
            focus_style(doc, link, style),
            link,
        );
        row.render(f, Rect::new(inner.x, inner.y + i as u16, inner.width, 1), hits);
    }
}

fn log_level_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Error => Style::default().fg(ERROR).add_modifier(Modifier::BOLD),
        LogLevel::Warn => Style::default().fg(HIGHLIGHT),
        LogLevel::Info => Style::default().fg(ACCENT),
        LogLevel::Debug | LogLevel::Trace => Style::default().fg(MUTED),
    }
}

fn format_log_entry(entry: &LogEntry) -> String {
    format!(
        "[{}] {:5} {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.level.as_str(),
        entry.message
    )
}

fn render_logs(f: &mut Frame, area: Rect, logs: &LogBuffer) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(MUTED))
        .title(" Logs ");
    let inner = block.inner(area);
    let width = usize::from(inner.width);
    let lines: Vec<Line> = logs
        .recent(usize::from(inner.height))
        .iter()
        .map(|entry| {
            Line::styled(
                truncate(&format_log_entry(entry), width),
                log_level_style(entry.level),
            )
        })
        .collect();
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines), inner);
}

fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let doc = app.page.document();
    let section = doc
        .query_all("nav ul li a")
        .into_iter()
        .find(|link| doc.has_class(*link, "active"))
        .map(|link| plain_text(doc.text(link)))
        .unwrap_or_default();
    let carousel = app.page.carousel();
    let left = format!(
        " {} │ {} │ slide {}/{} ",
        app.page.language().code().to_uppercase(),
        section,
        carousel.current_index() + 1,
        carousel.state().len().max(1)
    );
    let hints = "Tab focus · Enter open · ←/→ slides · m menu · l lang · g logs · q quit ";
    let gap = usize::from(area.width).saturating_sub(left.width());
    let line = Line::from(vec![
        Span::styled(left, Style::default().fg(Color::Black).bg(ACCENT)),
        Span::styled(
            format!("{:>gap$}", truncate(hints, gap), gap = gap),
            Style::default().fg(MUTED),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_error(f: &mut Frame, area: Rect, report: &ErrorReport) {
    let width = area.width.saturating_sub(4).min(90);
    let height = area.height.saturating_sub(4).min(20);
    let popup = centered_rect(width, height, area);
    f.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ERROR))
        .title(" Error ")
        .title_bottom(Line::from(" Esc dismiss · q quit ").right_aligned());
    let text = Paragraph::new(report.render_text())
        .block(block)
        .style(Style::default().fg(ERROR))
        .wrap(Wrap { trim: false });
    f.render_widget(text, popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::diagnostics::DiagnosticOverlay;
    use crate::i18n::{Dictionaries, TranslationStore};
    use crate::page::{build_portfolio, Page, Startup};
    use crate::storage::PreferenceStore;
    use ratatui::{backend::TestBackend, Terminal};

    fn page() -> Page {
        let dictionaries = Dictionaries::embedded().expect("dictionaries");
        let doc = build_portfolio(&dictionaries);
        let translations = TranslationStore::new(dictionaries, PreferenceStore::in_memory());
        Page::ready(doc, &Config::default(), translations, &Startup::default())
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_wrap_by_width() {
        assert_eq!(
            wrap("Olá, eu sou Silvio.\nEu transformo", 12),
            vec!["Olá, eu sou", "Silvio.", "Eu", "transformo"]
        );
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap("", 10), Vec::<String>::new());
    }

    #[test]
    fn test_truncate_marks_cut() {
        assert_eq!(truncate("Portfólio", 20), "Portfólio");
        assert_eq!(truncate("Portfólio", 5), "Port…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_centered_rect_clamps() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_rect(20, 4, area), Rect::new(10, 3, 20, 4));
        assert_eq!(centered_rect(60, 20, area), Rect::new(0, 0, 40, 10));
    }

    #[test]
    fn test_section_rows_cover_body() {
        let page = page();
        let model = body_model(
            page.document(),
            page.carousel(),
            TrackView::default(),
            80,
        );
        assert_eq!(model.section_rows.len(), 5);
        assert_eq!(model.section_rows.iter().sum::<usize>(), model.rows.len());
        let text: Vec<String> = model.rows.iter().map(Row::text).collect();
        assert!(text.iter().any(|t| t.contains("── portfolio")));
        assert!(text.iter().any(|t| t.contains("[ Ver Site ]")));
    }

    #[test]
    fn test_controls_row_targets_buttons_and_dots() {
        let page = page();
        let doc = page.document();
        let model = body_model(doc, page.carousel(), TrackView::default(), 80);
        let (prev, next) = page.carousel().buttons().expect("buttons");
        let (_, row) = *model
            .element_rows
            .iter()
            .find(|(id, _)| *id == prev)
            .expect("prev drawn");
        let controls = &model.rows[row];
        let targets: Vec<ElementId> = (0..80).filter_map(|c| controls.target_at(c)).collect();
        assert!(targets.contains(&next));
        for dot in page.carousel().indicator_dots() {
            assert!(targets.contains(dot));
        }
    }

    #[test]
    fn test_filmstrip_shifts_by_track_offset() {
        let face = |alt: &str| SlideFace {
            alt: alt.to_string(),
            caption: String::new(),
            link: None,
        };
        let faces = [face("A"), face("B")];
        // Halfway between slide 0 and 1 on a 10-column view
        let rows = filmstrip(&faces, 10, -5.0 * CELL_WIDTH_PX);
        let alt_row = &rows[1];
        assert_eq!(alt_row.chars().count(), 10);
        assert!(alt_row.contains('A') || alt_row.contains('B'));
        let settled = filmstrip(&faces, 10, -10.0 * CELL_WIDTH_PX);
        assert!(settled[1].contains('B'));
        assert!(!settled[1].contains('A'));
    }

    #[test]
    fn test_header_hides_inline_links_when_narrow_or_open() {
        let page = page();
        let doc = page.document();
        let wide = header_row(doc, false, 120);
        assert!(wide.text().contains("Portfólio"));
        assert!(wide.text().contains("EN"));
        let open = header_row(doc, true, 120);
        assert!(!open.text().contains("Portfólio"));
        let narrow = header_row(doc, false, 20);
        assert!(!narrow.text().contains("Portfólio"));
        assert!(narrow.text().contains("PT"));
    }

    #[test]
    fn test_draw_renders_page_and_hits() {
        let mut app = App::new(page(), DiagnosticOverlay::new(), LogBuffer::new());
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
        terminal.draw(|f| draw(f, &mut app)).expect("draw");
        let text = screen(&terminal);
        assert!(text.contains("Inicial"));
        assert!(text.contains("── home"));

        let toggle = app.page.menu().toggle_button().expect("toggle");
        assert_eq!(app.hits.target_at(1, 0), Some(toggle));
    }

    #[test]
    fn test_draw_error_overlay() {
        let overlay = DiagnosticOverlay::new();
        overlay.report(ErrorReport::new("handler failed"));
        let mut app = App::new(page(), overlay, LogBuffer::new());
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
        terminal.draw(|f| draw(f, &mut app)).expect("draw");
        assert!(screen(&terminal).contains("Error: handler failed"));
    }

    #[test]
    fn test_open_menu_panel_lists_links() {
        let mut app = App::new(page(), DiagnosticOverlay::new(), LogBuffer::new());
        app.toggle_menu();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
        terminal.draw(|f| draw(f, &mut app)).expect("draw");
        let text = screen(&terminal);
        assert!(text.contains("Contato"));

        // Clicking outside the panel hits the overlay and closes the menu
        app.mouse_down(2, 20);
        app.mouse_up(2, 20);
        assert!(!app.page.menu().is_open());
    }
}
