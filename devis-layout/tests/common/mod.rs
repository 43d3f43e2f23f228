#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use devis_layout::{Client, HeaderInfo, LineItem, QuantityUnit};
use pdf_surface::{BuiltinFont, Color, DrawingSurface, FontMetrics, SurfaceError, TextStyle};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Text {
        text: String,
        x: f64,
        y: f64,
        font: BuiltinFont,
        size: f64,
        color: Color,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

#[derive(Debug, Default)]
pub struct Recording {
    pub pages: Vec<Vec<Op>>,
    pub new_page_calls: usize,
    pub opened: Vec<usize>,
    pub emitted: bool,
}

impl Recording {
    pub fn texts(&self, page: usize) -> Vec<&str> {
        self.pages[page]
            .iter()
            .filter_map(|op| match op {
                Op::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Page holding the first text op equal to `needle`.
    pub fn page_of(&self, needle: &str) -> Option<usize> {
        self.pages.iter().position(|ops| {
            ops.iter()
                .any(|op| matches!(op, Op::Text { text, .. } if text == needle))
        })
    }

    /// Number of header bands (black filled rectangles) on a page.
    pub fn header_bands(&self, page: usize) -> usize {
        self.pages[page]
            .iter()
            .filter(|op| matches!(op, Op::Rect { color, .. } if *color == Color::BLACK))
            .count()
    }

    pub fn text_ops(&self, page: usize) -> Vec<(String, f64, f64)> {
        self.pages[page]
            .iter()
            .filter_map(|op| match op {
                Op::Text { text, x, y, .. } => Some((text.clone(), *x, *y)),
                _ => None,
            })
            .collect()
    }
}

/// A drawing surface that records every call per page. The recording is
/// shared so tests can inspect it after the surface has been consumed.
pub struct RecordingSurface {
    log: Rc<RefCell<Recording>>,
    current: usize,
    fail_measure: bool,
    page_size: (f64, f64),
}

impl RecordingSurface {
    pub fn new() -> (Self, Rc<RefCell<Recording>>) {
        let log = Rc::new(RefCell::new(Recording {
            pages: vec![Vec::new()],
            ..Recording::default()
        }));
        let surface = RecordingSurface {
            log: Rc::clone(&log),
            current: 0,
            fail_measure: false,
            page_size: (612.0, 792.0),
        };
        (surface, log)
    }

    /// A surface whose `measure_text` always fails.
    pub fn without_metrics() -> (Self, Rc<RefCell<Recording>>) {
        let (mut surface, log) = Self::new();
        surface.fail_measure = true;
        (surface, log)
    }

    /// A surface whose pages are `width` by `height` points.
    pub fn with_page_size(width: f64, height: f64) -> (Self, Rc<RefCell<Recording>>) {
        let (mut surface, log) = Self::new();
        surface.page_size = (width, height);
        (surface, log)
    }

    fn push(&mut self, op: Op) {
        self.log.borrow_mut().pages[self.current].push(op);
    }
}

impl DrawingSurface for RecordingSurface {
    fn measure_text(&self, text: &str, font: BuiltinFont, size: f64) -> Result<f64, SurfaceError> {
        if self.fail_measure {
            return Err(SurfaceError::MeasurementUnavailable("no font metrics".into()));
        }
        Ok(FontMetrics::measure_text(text, font, size))
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
        self.push(Op::Text {
            text: text.to_string(),
            x,
            y,
            font: style.font,
            size: style.font_size,
            color: style.color,
        });
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.push(Op::Line { x1, y1, x2, y2 });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.push(Op::Rect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn draw_image(
        &mut self,
        _bytes: &[u8],
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), SurfaceError> {
        self.push(Op::Image {
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn start_new_page(&mut self) {
        let mut log = self.log.borrow_mut();
        log.pages.push(Vec::new());
        log.new_page_calls += 1;
        self.current = log.pages.len() - 1;
    }

    fn page_count(&self) -> usize {
        self.log.borrow().pages.len()
    }

    fn current_page(&self) -> usize {
        self.current
    }

    fn open_page(&mut self, index: usize) -> Result<(), SurfaceError> {
        let mut log = self.log.borrow_mut();
        if index >= log.pages.len() {
            return Err(SurfaceError::PageOutOfRange {
                index,
                count: log.pages.len(),
            });
        }
        log.opened.push(index);
        self.current = index;
        Ok(())
    }

    fn page_size(&self) -> (f64, f64) {
        self.page_size
    }

    fn finalize_and_emit(self) -> Result<Vec<u8>, SurfaceError> {
        let mut log = self.log.borrow_mut();
        log.emitted = true;
        Ok(format!("{} pages", log.pages.len()).into_bytes())
    }
}

pub fn header(doc_number: &str) -> HeaderInfo {
    HeaderInfo {
        doc_number: doc_number.to_string(),
        issue_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        expiry_date: chrono::NaiveDate::from_ymd_opt(2024, 4, 3),
        project: Some("Rénovation cuisine".to_string()),
    }
}

pub fn client() -> Client {
    Client {
        name: "Mme Lefèvre".to_string(),
        address: Some("12 avenue des Tilleuls\n91000 Évry".to_string()),
        tax_id: None,
        email: Some("c.lefevre@example.fr".to_string()),
        phone: None,
    }
}

pub fn item(description: &str, quantity: Decimal, price: Decimal, rate: Decimal) -> LineItem {
    LineItem::new(description, quantity, QuantityUnit::Unit, price, rate)
}
