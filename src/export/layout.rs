//! Page flow for exported documents.
//!
//! The engine keeps one vertical cursor (mm from the top edge) on the current
//! page. Every block asks for its height first; when it does not fit in the
//! remaining printable area the engine opens a new page, resets the cursor and
//! draws the continuation header before the block. The result is a
//! `LayoutPlan`: pages of draw operations, independent of the PDF backend.

use serde::Serialize;

/// Points to millimetres.
pub const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.5;
const LINE_SPACING: f32 = 1.35;

pub const BODY_SIZE: f32 = 10.0;
pub const SMALL_SIZE: f32 = 8.5;
pub const HEADING_SIZE: f32 = 11.5;
pub const CONTINUATION_SIZE: f32 = 9.0;
pub const FOOTER_SIZE: f32 = 7.5;
pub const WATERMARK_SIZE: f32 = 54.0;

/// Cursor advance of a drawn rule.
const RULE_ADVANCE: f32 = 1.0;
const HEADING_GAP_ABOVE: f32 = 1.5;
const HEADING_GAP_BELOW: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RgbColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor::from_u8(0x11, 0x18, 0x27);
    pub const GREY: RgbColor = RgbColor::from_u8(0x6b, 0x72, 0x80);
    pub const LIGHT_GREY: RgbColor = RgbColor::from_u8(0xe5, 0xe7, 0xeb);
    pub const DEFAULT_ACCENT: RgbColor = RgbColor::from_u8(0x1e, 0x40, 0xaf);

    pub const fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Parses `#RRGGBB` or `RRGGBB`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::from_u8(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

/// One drawing command. `y` is the baseline, in mm from the top edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size: f32,
        style: FontStyle,
        color: RgbColor,
        text: String,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        thickness: f32,
        color: RgbColor,
    },
    Watermark {
        text: String,
        size: f32,
        color: RgbColor,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub number: usize,
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// First text line on the page.
    pub fn first_line(&self) -> Option<&str> {
        self.lines().next()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutPlan {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub pages: Vec<Page>,
}

impl LayoutPlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Whether any page has a text line exactly equal to `line`.
    pub fn has_line(&self, line: &str) -> bool {
        self.pages.iter().any(|p| p.lines().any(|l| l == line))
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.pages.iter().any(|p| p.lines().any(|l| l.contains(needle)))
    }
}

/// A4 with uniform side margins.
#[derive(Debug, Clone, Copy)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margin_top: 18.0,
            margin_bottom: 20.0,
            margin_left: 20.0,
            margin_right: 20.0,
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn content_bottom(&self) -> f32 {
        self.height - self.margin_bottom
    }
}

pub fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * LINE_SPACING
}

/// Vertical space a section heading takes, rule and gaps included.
fn heading_height() -> f32 {
    HEADING_GAP_ABOVE + line_height(HEADING_SIZE) + RULE_ADVANCE + HEADING_GAP_BELOW
}

/// Approximate characters per line for `size` within `width` mm.
pub fn chars_per_line(size: f32, width: f32) -> usize {
    ((width / (size * PT_TO_MM * AVG_GLYPH_EM)).floor() as usize).max(8)
}

/// Text block styling.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub size: f32,
    pub style: FontStyle,
    pub color: RgbColor,
    pub indent: f32,
}

impl TextStyle {
    pub const BODY: TextStyle = TextStyle {
        size: BODY_SIZE,
        style: FontStyle::Regular,
        color: RgbColor::BLACK,
        indent: 0.0,
    };

    pub fn bold(mut self) -> Self {
        self.style = FontStyle::Bold;
        self
    }

    pub fn sized(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn colored(mut self, color: RgbColor) -> Self {
        self.color = color;
        self
    }

    pub fn indented(mut self, indent: f32) -> Self {
        self.indent = indent;
        self
    }
}

pub struct LayoutEngine {
    geometry: PageGeometry,
    title: String,
    continuation_header: String,
    watermark: Option<String>,
    accent: RgbColor,
    pages: Vec<Page>,
    cursor: f32,
    /// Body content drawn on the current page. A page never breaks before
    /// its first block, so an oversized block cannot loop.
    page_has_body: bool,
}

impl LayoutEngine {
    pub fn new(
        geometry: PageGeometry,
        title: impl Into<String>,
        continuation_header: impl Into<String>,
        watermark: Option<String>,
        accent: RgbColor,
    ) -> Self {
        let mut engine = Self {
            geometry,
            title: title.into(),
            continuation_header: continuation_header.into(),
            watermark: watermark.filter(|w| !w.trim().is_empty()),
            accent,
            pages: Vec::new(),
            cursor: geometry.margin_top,
            page_has_body: false,
        };
        engine.open_page();
        engine
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn accent(&self) -> RgbColor {
        self.accent
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn page_number(&self) -> usize {
        self.pages.len()
    }

    pub fn remaining(&self) -> f32 {
        self.geometry.content_bottom() - self.cursor
    }

    /// Breaks the page when `height` does not fit. Returns whether it broke.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        if height > self.remaining() && self.page_has_body {
            self.break_page();
            return true;
        }
        false
    }

    fn open_page(&mut self) {
        let number = self.pages.len() + 1;
        let mut ops = Vec::new();
        if let Some(text) = &self.watermark {
            ops.push(DrawOp::Watermark {
                text: text.clone(),
                size: WATERMARK_SIZE,
                color: RgbColor::LIGHT_GREY,
            });
        }
        self.pages.push(Page { number, ops });
        self.cursor = self.geometry.margin_top;
        self.page_has_body = false;
    }

    fn break_page(&mut self) {
        self.open_page();
        let header = self.continuation_header.clone();
        self.draw_line(
            &header,
            TextStyle::BODY
                .sized(CONTINUATION_SIZE)
                .bold()
                .colored(RgbColor::GREY),
        );
        self.rule(0.3, RgbColor::LIGHT_GREY);
        self.gap(3.0);
    }

    fn current(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn draw_line(&mut self, text: &str, style: TextStyle) {
        let lh = line_height(style.size);
        let x = self.geometry.margin_left + style.indent;
        let y = self.cursor + style.size * PT_TO_MM;
        self.current().ops.push(DrawOp::Text {
            x,
            y,
            size: style.size,
            style: style.style,
            color: style.color,
            text: text.to_string(),
        });
        self.cursor += lh;
    }

    /// Wrapped paragraph. Breaks between lines as needed.
    pub fn paragraph(&mut self, text: &str, style: TextStyle) {
        let width = self.geometry.content_width() - style.indent;
        for line in wrap_text(text, chars_per_line(style.size, width)) {
            self.ensure_space(line_height(style.size));
            self.draw_line(&line, style);
            self.page_has_body = true;
        }
    }

    /// Multi-line free text: one paragraph per input line, blank lines kept
    /// as half-line gaps.
    pub fn text_block(&mut self, text: &str, style: TextStyle) {
        for raw in text.lines() {
            if raw.trim().is_empty() {
                self.gap(line_height(style.size) / 2.0);
            } else {
                self.paragraph(raw.trim_end(), style);
            }
        }
    }

    /// Section heading kept together with the first line that follows it.
    pub fn heading(&mut self, text: &str) {
        self.ensure_space(heading_height() + line_height(BODY_SIZE));
        self.gap(HEADING_GAP_ABOVE);
        let style = TextStyle::BODY.sized(HEADING_SIZE).bold().colored(self.accent);
        self.draw_line(text, style);
        self.rule(0.4, self.accent);
        self.gap(HEADING_GAP_BELOW);
        self.page_has_body = true;
    }

    /// Label and value as one wrapped paragraph.
    pub fn field(&mut self, label: &str, value: &str) {
        self.paragraph(&format!("{label}: {value}"), TextStyle::BODY);
    }

    /// Reserves `height` so a block is not split across pages.
    pub fn keep_together(&mut self, height: f32) {
        self.ensure_space(height);
    }

    pub fn rule(&mut self, thickness: f32, color: RgbColor) {
        let x1 = self.geometry.margin_left;
        let x2 = self.geometry.width - self.geometry.margin_right;
        let y = self.cursor;
        self.current().ops.push(DrawOp::Rule { x1, x2, y, thickness, color });
        self.cursor += RULE_ADVANCE;
    }

    /// Short rule at an explicit horizontal span, e.g. a signature line.
    pub fn rule_span(&mut self, x1: f32, x2: f32, thickness: f32) {
        let y = self.cursor;
        self.current().ops.push(DrawOp::Rule {
            x1,
            x2,
            y,
            thickness,
            color: RgbColor::BLACK,
        });
        self.cursor += RULE_ADVANCE;
    }

    pub fn gap(&mut self, mm: f32) {
        self.cursor = (self.cursor + mm).min(self.geometry.content_bottom());
    }

    /// Adds "Page N of M" and `footer_note` to every page.
    pub fn finish(mut self, footer_note: &str) -> LayoutPlan {
        let total = self.pages.len();
        let y = self.geometry.height - self.geometry.margin_bottom / 2.0;
        let left = self.geometry.margin_left;
        let right = self.geometry.width - self.geometry.margin_right - 22.0;
        for page in &mut self.pages {
            page.ops.push(DrawOp::Text {
                x: left,
                y,
                size: FOOTER_SIZE,
                style: FontStyle::Italic,
                color: RgbColor::GREY,
                text: footer_note.to_string(),
            });
            page.ops.push(DrawOp::Text {
                x: right,
                y,
                size: FOOTER_SIZE,
                style: FontStyle::Regular,
                color: RgbColor::GREY,
                text: format!("Page {} of {}", page.number, total),
            });
        }
        LayoutPlan {
            title: self.title,
            width: self.geometry.width,
            height: self.geometry.height,
            pages: self.pages,
        }
    }
}

/// Word wrap by character count. Words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split = word
                .char_indices()
                .nth(max_chars)
                .map_or(word.len(), |(i, _)| i);
            lines.push(word[..split].to_string());
            word = &word[split..];
        }
        if word.is_empty() {
            continue;
        }
        let needed = current.chars().count() + word.chars().count() + 1;
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> LayoutEngine {
        LayoutEngine::new(
            PageGeometry::default(),
            "Consultation Report",
            "Nkosi, Thandi | Consultation Report (continued)",
            None,
            RgbColor::DEFAULT_ACCENT,
        )
    }

    #[test]
    fn test_wrap_text() {
        let text = "This is a long sentence that should be wrapped at around forty characters or so.";
        let lines = wrap_text(text, 40);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 40);
        }
    }

    #[test]
    fn test_wrap_text_short() {
        let lines = wrap_text("Short", 40);
        assert_eq!(lines, vec!["Short"]);
    }

    #[test]
    fn test_wrap_text_empty() {
        let lines = wrap_text("", 40);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_wrap_text_splits_long_words() {
        let lines = wrap_text("abcdefghij klm", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij", "klm"]);
    }

    #[test]
    fn hex_colors() {
        assert_eq!(RgbColor::from_hex("#1e40af"), Some(RgbColor::DEFAULT_ACCENT));
        assert_eq!(RgbColor::from_hex("ffffff"), Some(RgbColor { r: 1.0, g: 1.0, b: 1.0 }));
        assert_eq!(RgbColor::from_hex("#12345"), None);
        assert_eq!(RgbColor::from_hex("#gg0000"), None);
        assert_eq!(RgbColor::from_hex("blue"), None);
    }

    #[test]
    fn cursor_advances_per_line() {
        let mut e = engine();
        let start = e.cursor();
        e.paragraph("one line", TextStyle::BODY);
        assert!((e.cursor() - start - line_height(BODY_SIZE)).abs() < 1e-4);
    }

    #[test]
    fn overflow_opens_new_page_with_continuation_header() {
        let mut e = engine();
        for i in 0..200 {
            e.paragraph(&format!("Line {i}"), TextStyle::BODY);
        }
        assert!(e.page_number() > 1);
        let plan = e.finish("Generated now");
        assert_eq!(plan.pages[0].first_line(), Some("Line 0"));
        for page in &plan.pages[1..] {
            assert_eq!(
                page.first_line(),
                Some("Nkosi, Thandi | Consultation Report (continued)")
            );
        }
    }

    #[test]
    fn text_never_crosses_bottom_margin() {
        let mut e = engine();
        for _ in 0..120 {
            e.paragraph("Lorem ipsum dolor sit amet, consectetur adipiscing elit.", TextStyle::BODY);
        }
        let bottom = PageGeometry::default().content_bottom();
        let plan = e.finish("");
        for page in &plan.pages {
            for op in &page.ops {
                if let DrawOp::Text { y, size, .. } = op {
                    if *size != FOOTER_SIZE {
                        assert!(*y <= bottom, "baseline {y} below {bottom}");
                    }
                }
            }
        }
    }

    #[test]
    fn heading_is_not_orphaned() {
        let mut e = engine();
        while e.remaining() > line_height(HEADING_SIZE) {
            e.paragraph("filler", TextStyle::BODY);
        }
        let before = e.page_number();
        e.heading("Diagnosis");
        assert_eq!(e.page_number(), before + 1);
    }

    #[test]
    fn heading_advance_matches_reservation() {
        let mut e = engine();
        let start = e.cursor();
        e.heading("Diagnosis");
        assert!((e.cursor() - start - heading_height()).abs() < 1e-4);
    }

    #[test]
    fn heading_moves_with_first_line_near_page_bottom() {
        // Room for the heading line and one body line, but not for the
        // gaps and rule around the heading.
        let mut e = engine();
        e.paragraph("Patient Information", TextStyle::BODY);
        let room = line_height(HEADING_SIZE) + 3.0 + line_height(BODY_SIZE);
        e.cursor = e.geometry().content_bottom() - room;

        e.heading("Diagnosis");
        e.paragraph("1. Acute bronchitis", TextStyle::BODY);

        let plan = e.finish("");
        let page_of = |line: &str| plan.pages.iter().position(|p| p.lines().any(|l| l == line));
        assert_eq!(page_of("Diagnosis"), Some(1));
        assert_eq!(page_of("1. Acute bronchitis"), Some(1));
    }

    #[test]
    fn footer_numbers_every_page() {
        let mut e = engine();
        for i in 0..150 {
            e.paragraph(&format!("Line {i}"), TextStyle::BODY);
        }
        let plan = e.finish("Generated 2026-03-02 10:00");
        let total = plan.page_count();
        for page in &plan.pages {
            let footer = format!("Page {} of {}", page.number, total);
            assert!(page.lines().any(|l| l == footer));
            assert!(page.lines().any(|l| l == "Generated 2026-03-02 10:00"));
        }
    }

    #[test]
    fn watermark_drawn_first_on_every_page() {
        let mut e = LayoutEngine::new(
            PageGeometry::default(),
            "Prescription",
            "continued",
            Some("COPY".into()),
            RgbColor::DEFAULT_ACCENT,
        );
        for i in 0..150 {
            e.paragraph(&format!("Line {i}"), TextStyle::BODY);
        }
        let plan = e.finish("");
        assert!(plan.page_count() > 1);
        for page in &plan.pages {
            assert!(matches!(&page.ops[0], DrawOp::Watermark { text, .. } if text == "COPY"));
        }
    }

    #[test]
    fn blank_watermark_is_ignored() {
        let e = LayoutEngine::new(
            PageGeometry::default(),
            "t",
            "c",
            Some("  ".into()),
            RgbColor::DEFAULT_ACCENT,
        );
        let plan = e.finish("");
        assert!(!plan.pages[0].ops.iter().any(|op| matches!(op, DrawOp::Watermark { .. })));
    }
}
