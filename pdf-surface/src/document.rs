use std::collections::BTreeSet;
use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use tracing::debug;

use crate::error::SurfaceError;
use crate::fonts::{BuiltinFont, FontMetrics};
use crate::graphics::{Color, TextStyle};
use crate::images::{load_image, ImageData, ImageFormat};
use crate::objects::{ObjId, PdfObject};
use crate::surface::DrawingSurface;
use crate::writer::{literal_string, PdfWriter};

const CATALOG_OBJ: ObjId = ObjId(1, 0);
const PAGES_OBJ: ObjId = ObjId(2, 0);
const FIRST_FONT_OBJ_NUM: u32 = 3;

/// US letter, in points.
pub const LETTER: (f64, f64) = (612.0, 792.0);

/// A `DrawingSurface` that produces a PDF 1.7 file.
///
/// Every page's content stream is kept in memory until
/// `finalize_and_emit`, so earlier pages can still be drawn on (page
/// number footers, for instance) after later pages exist. Nothing is
/// written to the output before that call.
pub struct PdfSurface {
    width: f64,
    height: f64,
    pages: Vec<PageBuffer>,
    current: usize,
    images: Vec<ImageData>,
    info: Vec<(String, String)>,
    compress: bool,
    line_width: f64,
}

#[derive(Default)]
struct PageBuffer {
    content_ops: Vec<u8>,
    images: BTreeSet<usize>,
}

impl PdfSurface {
    /// Create a surface with one empty page of the given size.
    pub fn new(width: f64, height: f64) -> Self {
        PdfSurface {
            width,
            height,
            pages: vec![PageBuffer::default()],
            current: 0,
            images: Vec::new(),
            info: Vec::new(),
            compress: false,
            line_width: 0.5,
        }
    }

    /// Create a US letter surface.
    pub fn letter() -> Self {
        Self::new(LETTER.0, LETTER.1)
    }

    /// Enable or disable FlateDecode compression of streams.
    pub fn set_compression(&mut self, enabled: bool) -> &mut Self {
        self.compress = enabled;
        self
    }

    /// Stroke width used by `draw_line`.
    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.line_width = width;
        self
    }

    /// Set a document info entry (e.g. "Title", "Creator").
    pub fn set_info(&mut self, key: &str, value: &str) -> &mut Self {
        self.info.push((key.to_string(), value.to_string()));
        self
    }

    fn ops(&mut self) -> &mut Vec<u8> {
        &mut self.pages[self.current].content_ops
    }

    fn push_ops(&mut self, ops: String) {
        self.ops().extend_from_slice(ops.as_bytes());
    }

    /// Stream object, compressed when enabled.
    fn make_stream(&self, mut dict: Vec<(&str, PdfObject)>, data: Vec<u8>) -> io::Result<PdfObject> {
        if !self.compress {
            return Ok(PdfObject::stream(dict, data));
        }
        let packed = deflate(&data)?;
        dict.push(("Filter", PdfObject::name("FlateDecode")));
        Ok(PdfObject::stream(dict, packed))
    }

    fn image_object(&self, image: &ImageData, smask: Option<ObjId>) -> io::Result<PdfObject> {
        let mut dict = vec![
            ("Type", PdfObject::name("XObject")),
            ("Subtype", PdfObject::name("Image")),
            ("Width", PdfObject::Integer(image.width as i64)),
            ("Height", PdfObject::Integer(image.height as i64)),
            ("ColorSpace", PdfObject::name(image.color_space.pdf_name())),
            ("BitsPerComponent", PdfObject::Integer(8)),
        ];
        if let Some(id) = smask {
            dict.push(("SMask", PdfObject::Reference(id)));
        }
        match image.format {
            ImageFormat::Jpeg => {
                dict.push(("Filter", PdfObject::name("DCTDecode")));
                Ok(PdfObject::stream(dict, image.data.clone()))
            }
            ImageFormat::Png => self.make_stream(dict, image.data.clone()),
        }
    }

    fn smask_object(&self, image: &ImageData, alpha: &[u8]) -> io::Result<PdfObject> {
        let dict = vec![
            ("Type", PdfObject::name("XObject")),
            ("Subtype", PdfObject::name("Image")),
            ("Width", PdfObject::Integer(image.width as i64)),
            ("Height", PdfObject::Integer(image.height as i64)),
            ("ColorSpace", PdfObject::name("DeviceGray")),
            ("BitsPerComponent", PdfObject::Integer(8)),
        ];
        self.make_stream(dict, alpha.to_vec())
    }
}

impl DrawingSurface for PdfSurface {
    fn measure_text(
        &self,
        text: &str,
        font: BuiltinFont,
        font_size: f64,
    ) -> Result<f64, SurfaceError> {
        Ok(FontMetrics::measure_text(text, font, font_size))
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        let ops = format!(
            "BT\n{} rg\n/{} {} Tf\n{} {} Td\n{} Tj\nET\n",
            color_triplet(style.color),
            style.font.pdf_name(),
            format_coord(style.font_size),
            format_coord(x),
            format_coord(y),
            literal_string(text),
        );
        self.push_ops(ops);
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let ops = format!(
            "q\n{} w\n{} {} m\n{} {} l\nS\nQ\n",
            format_coord(self.line_width),
            format_coord(x1),
            format_coord(y1),
            format_coord(x2),
            format_coord(y2),
        );
        self.push_ops(ops);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        let ops = format!(
            "q\n{} rg\n{} {} {} {} re\nf\nQ\n",
            color_triplet(color),
            format_coord(x),
            format_coord(y),
            format_coord(width),
            format_coord(height),
        );
        self.push_ops(ops);
    }

    fn draw_image(
        &mut self,
        bytes: &[u8],
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), SurfaceError> {
        let image = load_image(bytes)?;
        let index = self.images.len();
        self.images.push(image);
        self.pages[self.current].images.insert(index);
        let ops = format!(
            "q\n{} 0 0 {} {} {} cm\n/Im{} Do\nQ\n",
            format_coord(width),
            format_coord(height),
            format_coord(x),
            format_coord(y),
            index + 1,
        );
        self.push_ops(ops);
        Ok(())
    }

    fn start_new_page(&mut self) {
        self.pages.push(PageBuffer::default());
        self.current = self.pages.len() - 1;
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn current_page(&self) -> usize {
        self.current
    }

    fn open_page(&mut self, index: usize) -> Result<(), SurfaceError> {
        if index >= self.pages.len() {
            return Err(SurfaceError::PageOutOfRange {
                index,
                count: self.pages.len(),
            });
        }
        self.current = index;
        Ok(())
    }

    fn page_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn finalize_and_emit(self) -> Result<Vec<u8>, SurfaceError> {
        let mut writer = PdfWriter::new(Vec::new());
        writer.write_header()?;

        let mut next_obj_num = FIRST_FONT_OBJ_NUM;
        let mut font_entries = Vec::new();
        for font in BuiltinFont::ALL {
            let id = ObjId(next_obj_num, 0);
            next_obj_num += 1;
            let dict = PdfObject::dict(vec![
                ("Type", PdfObject::name("Font")),
                ("Subtype", PdfObject::name("Type1")),
                ("BaseFont", PdfObject::name(font.pdf_base_name())),
                ("Encoding", PdfObject::name("WinAnsiEncoding")),
            ]);
            writer.write_object(id, &dict)?;
            font_entries.push((font.pdf_name(), PdfObject::Reference(id)));
        }

        let mut image_ids = Vec::with_capacity(self.images.len());
        for image in &self.images {
            let smask_id = match &image.smask_data {
                Some(alpha) => {
                    let id = ObjId(next_obj_num, 0);
                    next_obj_num += 1;
                    writer.write_object(id, &self.smask_object(image, alpha)?)?;
                    Some(id)
                }
                None => None,
            };
            let id = ObjId(next_obj_num, 0);
            next_obj_num += 1;
            writer.write_object(id, &self.image_object(image, smask_id)?)?;
            image_ids.push(id);
        }

        let mut page_ids = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let content_id = ObjId(next_obj_num, 0);
            let page_id = ObjId(next_obj_num + 1, 0);
            next_obj_num += 2;

            let content = self.make_stream(vec![], page.content_ops.clone())?;
            writer.write_object(content_id, &content)?;

            let mut resources = vec![("Font", PdfObject::dict(font_entries.clone()))];
            if !page.images.is_empty() {
                let names: Vec<String> =
                    page.images.iter().map(|i| format!("Im{}", i + 1)).collect();
                let xobjects = page
                    .images
                    .iter()
                    .zip(&names)
                    .map(|(&i, name)| (name.as_str(), PdfObject::Reference(image_ids[i])))
                    .collect();
                resources.push(("XObject", PdfObject::dict(xobjects)));
            }

            let page_dict = PdfObject::dict(vec![
                ("Type", PdfObject::name("Page")),
                ("Parent", PdfObject::Reference(PAGES_OBJ)),
                (
                    "MediaBox",
                    PdfObject::array(vec![
                        PdfObject::Integer(0),
                        PdfObject::Integer(0),
                        PdfObject::Real(self.width),
                        PdfObject::Real(self.height),
                    ]),
                ),
                ("Contents", PdfObject::Reference(content_id)),
                ("Resources", PdfObject::dict(resources)),
            ]);
            writer.write_object(page_id, &page_dict)?;
            page_ids.push(page_id);
        }

        let info_id = if self.info.is_empty() {
            None
        } else {
            let id = ObjId(next_obj_num, 0);
            let entries = self
                .info
                .iter()
                .map(|(k, v)| (k.as_str(), PdfObject::text(v)))
                .collect();
            writer.write_object(id, &PdfObject::dict(entries))?;
            Some(id)
        };

        let pages = PdfObject::dict(vec![
            ("Type", PdfObject::name("Pages")),
            (
                "Kids",
                PdfObject::Array(page_ids.iter().map(|id| PdfObject::Reference(*id)).collect()),
            ),
            ("Count", PdfObject::Integer(page_ids.len() as i64)),
        ]);
        writer.write_object(PAGES_OBJ, &pages)?;

        let catalog = PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PdfObject::Reference(PAGES_OBJ)),
        ]);
        writer.write_object(CATALOG_OBJ, &catalog)?;
        writer.write_xref_and_trailer(CATALOG_OBJ, info_id)?;

        let bytes = writer.into_inner();
        debug!(
            pages = page_ids.len(),
            images = image_ids.len(),
            bytes = bytes.len(),
            "pdf document emitted"
        );
        Ok(bytes)
    }
}

fn deflate(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

fn color_triplet(color: Color) -> String {
    format!(
        "{} {} {}",
        format_coord(color.r),
        format_coord(color.g),
        format_coord(color.b)
    )
}

/// Format a coordinate value for PDF content streams.
pub fn format_coord(v: f64) -> String {
    if v == v.floor() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.4}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
