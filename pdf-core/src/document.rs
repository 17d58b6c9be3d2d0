use std::collections::BTreeSet;
use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::fonts::{BuiltinFont, FontMetrics};
use crate::graphics::Color;
use crate::images::{load_image, ImageData, ImageError, ImageFormat, ImageId};
use crate::objects::{ObjId, PdfObject};
use crate::tables::{Row, Table, TableCursor, TextAlign};
use crate::wrap::{FitResult, TextStyle};
use crate::writer::{encode_text, PdfWriter};

const CATALOG_OBJ: ObjId = ObjId(1, 0);
const PAGES_OBJ: ObjId = ObjId(2, 0);
const FIRST_FONT_OBJ_NUM: u32 = 3;
const FIRST_DYNAMIC_OBJ_NUM: u32 = FIRST_FONT_OBJ_NUM + BuiltinFont::ALL.len() as u32;

/// High-level API for building PDF documents.
///
/// Generic over `Write`; quotes render into an in-memory `Vec<u8>`.
///
/// Pages are written incrementally: `end_page()` flushes page data
/// to the writer and frees page content from memory.
pub struct PdfDocument<W: Write> {
    writer: PdfWriter<W>,
    info: Vec<(String, String)>,
    page_obj_ids: Vec<ObjId>,
    current_page: Option<PageBuilder>,
    images: Vec<LoadedImage>,
    next_obj_num: u32,
    compress: bool,
}

struct PageBuilder {
    width: f64,
    height: f64,
    content_ops: Vec<u8>,
    used_images: BTreeSet<usize>,
}

struct LoadedImage {
    obj_id: ObjId,
    width: u32,
    height: u32,
}

fn font_obj(font: BuiltinFont) -> ObjId {
    let index = BuiltinFont::ALL
        .iter()
        .position(|f| *f == font)
        .unwrap_or(0);
    ObjId(FIRST_FONT_OBJ_NUM + index as u32, 0)
}

impl<W: Write> PdfDocument<W> {
    /// Create a new PDF document that writes to the given writer.
    /// Writes the PDF header and the shared font objects immediately.
    pub fn new(writer: W) -> io::Result<Self> {
        let mut pdf_writer = PdfWriter::new(writer);
        pdf_writer.write_header()?;

        for font in BuiltinFont::ALL {
            let dict = PdfObject::dict(vec![
                ("Type", PdfObject::name("Font")),
                ("Subtype", PdfObject::name("Type1")),
                ("BaseFont", PdfObject::name(font.pdf_base_name())),
                ("Encoding", PdfObject::name("WinAnsiEncoding")),
            ]);
            pdf_writer.write_object(font_obj(font), &dict)?;
        }

        Ok(PdfDocument {
            writer: pdf_writer,
            info: Vec::new(),
            page_obj_ids: Vec::new(),
            current_page: None,
            images: Vec::new(),
            next_obj_num: FIRST_DYNAMIC_OBJ_NUM,
            compress: false,
        })
    }

    /// Set a document info entry (e.g. "Creator", "Title").
    pub fn set_info(&mut self, key: &str, value: &str) -> &mut Self {
        self.info.push((key.to_string(), value.to_string()));
        self
    }

    /// Compress page content streams with FlateDecode. Off by default
    /// so content streams stay human-readable.
    pub fn set_compression(&mut self, enabled: bool) -> &mut Self {
        self.compress = enabled;
        self
    }

    /// Number of pages finished so far.
    pub fn page_count(&self) -> usize {
        self.page_obj_ids.len()
    }

    fn alloc_obj(&mut self) -> ObjId {
        let id = ObjId(self.next_obj_num, 0);
        self.next_obj_num += 1;
        id
    }

    /// # Panics
    /// When no page is open; drawing requires `begin_page` first.
    fn page(&mut self) -> &mut PageBuilder {
        self.current_page
            .as_mut()
            .expect("drawing operation called with no open page")
    }

    fn push_ops(&mut self, ops: &[u8]) -> &mut Self {
        self.page().content_ops.extend_from_slice(ops);
        self
    }

    /// Begin a new page with the given dimensions in points.
    /// If a page is currently open, it is closed first.
    pub fn begin_page(&mut self, width: f64, height: f64) -> io::Result<&mut Self> {
        if self.current_page.is_some() {
            self.end_page()?;
        }
        self.current_page = Some(PageBuilder {
            width,
            height,
            content_ops: Vec::new(),
            used_images: BTreeSet::new(),
        });
        Ok(self)
    }

    /// Place text with its baseline starting at (x, y).
    /// Coordinates use PDF's default bottom-left origin.
    pub fn place_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> &mut Self {
        let mut ops = format!(
            "BT\n/{} {} Tf\n{} {} Td\n(",
            style.font.pdf_name(),
            format_coord(style.font_size),
            format_coord(x),
            format_coord(y),
        )
        .into_bytes();
        ops.extend_from_slice(&encode_text(text));
        ops.extend_from_slice(b") Tj\nET\n");
        self.push_ops(&ops)
    }

    /// Place text aligned against `x`: `Left` starts at x, `Right` ends
    /// at x, `Center` is centered on x.
    pub fn place_text_aligned(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        style: &TextStyle,
        align: TextAlign,
    ) -> &mut Self {
        let width = FontMetrics::measure_text(text, style.font, style.font_size);
        let start = match align {
            TextAlign::Left => x,
            TextAlign::Right => x - width,
            TextAlign::Center => x - width / 2.0,
        };
        self.place_text(text, start, y, style)
    }

    /// Save the graphics state (`q`).
    pub fn save_state(&mut self) -> &mut Self {
        self.push_ops(b"q\n")
    }

    /// Restore the graphics state (`Q`).
    pub fn restore_state(&mut self) -> &mut Self {
        self.push_ops(b"Q\n")
    }

    pub fn set_stroke_color(&mut self, color: Color) -> &mut Self {
        self.push_ops(color.stroke_op().as_bytes())
    }

    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.push_ops(format!("{} w\n", format_coord(width)).as_bytes())
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push_ops(format!("{} {} m\n", format_coord(x), format_coord(y)).as_bytes())
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push_ops(format!("{} {} l\n", format_coord(x), format_coord(y)).as_bytes())
    }

    /// Stroke the current path.
    pub fn stroke(&mut self) -> &mut Self {
        self.push_ops(b"S\n")
    }

    /// Decode image bytes (JPEG or PNG) and write them as an image
    /// XObject. The returned handle can be placed on any page.
    pub fn load_image_bytes(&mut self, data: Vec<u8>) -> Result<ImageId, ImageError> {
        let image = load_image(data)?;
        let obj_id = self.write_image(&image)?;
        self.images.push(LoadedImage {
            obj_id,
            width: image.width,
            height: image.height,
        });
        Ok(ImageId(self.images.len() - 1))
    }

    fn write_image(&mut self, image: &ImageData) -> io::Result<ObjId> {
        let smask_id = match &image.smask_data {
            Some(alpha) => {
                let id = self.alloc_obj();
                let smask = PdfObject::stream(
                    image_dict(image.width, image.height, "DeviceGray", "FlateDecode"),
                    deflate(alpha)?,
                );
                self.writer.write_object(id, &smask)?;
                Some(id)
            }
            None => None,
        };

        let (filter, data) = match image.format {
            ImageFormat::Jpeg => ("DCTDecode", image.data.clone()),
            ImageFormat::Png => ("FlateDecode", deflate(&image.data)?),
        };
        let mut dict = image_dict(
            image.width,
            image.height,
            image.color_space.pdf_name(),
            filter,
        );
        if let Some(id) = smask_id {
            dict.push(("SMask", PdfObject::Reference(id)));
        }
        let id = self.alloc_obj();
        self.writer.write_object(id, &PdfObject::stream(dict, data))?;
        Ok(id)
    }

    /// Pixel dimensions of a loaded image.
    pub fn image_dimensions(&self, image: &ImageId) -> Option<(u32, u32)> {
        self.images.get(image.0).map(|img| (img.width, img.height))
    }

    /// Draw a loaded image with its bottom-left corner at (x, y),
    /// scaled to `width`×`height` points.
    pub fn place_image(
        &mut self,
        image: &ImageId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> &mut Self {
        let ops = format!(
            "q\n{} 0 0 {} {} {} cm\n/Im{} Do\nQ\n",
            format_coord(width),
            format_coord(height),
            format_coord(x),
            format_coord(y),
            image.0 + 1,
        );
        self.page().used_images.insert(image.0);
        self.push_ops(ops.as_bytes())
    }

    /// Place `row` at the cursor if it fits; otherwise return
    /// `FitResult::BoxFull` and leave the page untouched so the caller
    /// can turn the page.
    pub fn fit_row(
        &mut self,
        table: &Table,
        row: &Row,
        cursor: &mut TableCursor,
    ) -> io::Result<FitResult> {
        let (ops, result) = table.generate_row_ops(row, cursor);
        self.push_ops(&ops);
        Ok(result)
    }

    /// Place `row` at the cursor regardless of remaining space.
    pub fn place_row(&mut self, table: &Table, row: &Row, cursor: &mut TableCursor) -> &mut Self {
        let ops = table.place_row_ops(row, cursor);
        self.push_ops(&ops)
    }

    /// End the current page. Writes page objects to the
    /// writer and frees page content from memory.
    pub fn end_page(&mut self) -> io::Result<()> {
        let Some(page) = self.current_page.take() else {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "end_page called with no open page",
            ));
        };

        let content_id = self.alloc_obj();
        let page_id = self.alloc_obj();

        let content_stream = if self.compress {
            PdfObject::stream(
                vec![("Filter", PdfObject::name("FlateDecode"))],
                deflate(&page.content_ops)?,
            )
        } else {
            PdfObject::stream(vec![], page.content_ops)
        };
        self.writer.write_object(content_id, &content_stream)?;

        let fonts = BuiltinFont::ALL
            .iter()
            .map(|f| (f.pdf_name(), PdfObject::Reference(font_obj(*f))))
            .collect();
        let mut resources = vec![("Font", PdfObject::dict(fonts))];
        if !page.used_images.is_empty() {
            let names: Vec<String> = page
                .used_images
                .iter()
                .map(|i| format!("Im{}", i + 1))
                .collect();
            let xobjects = page
                .used_images
                .iter()
                .zip(&names)
                .map(|(i, name)| (name.as_str(), PdfObject::Reference(self.images[*i].obj_id)))
                .collect();
            resources.push(("XObject", PdfObject::dict(xobjects)));
        }

        let page_dict = PdfObject::dict(vec![
            ("Type", PdfObject::name("Page")),
            ("Parent", PdfObject::Reference(PAGES_OBJ)),
            ("MediaBox", PdfObject::rect(page.width, page.height)),
            ("Contents", PdfObject::Reference(content_id)),
            ("Resources", PdfObject::dict(resources)),
        ]);
        self.writer.write_object(page_id, &page_dict)?;

        self.page_obj_ids.push(page_id);
        Ok(())
    }

    /// Finish the document. Writes the catalog, pages tree,
    /// info dictionary, xref table, and trailer.
    /// Consumes self — no further operations are possible.
    pub fn end_document(mut self) -> io::Result<W> {
        if self.current_page.is_some() {
            self.end_page()?;
        }

        let info_id = if self.info.is_empty() {
            None
        } else {
            let id = self.alloc_obj();
            let entries = self
                .info
                .iter()
                .map(|(k, v)| (k.as_str(), PdfObject::literal_string(v)))
                .collect();
            self.writer.write_object(id, &PdfObject::dict(entries))?;
            Some(id)
        };

        let kids = self
            .page_obj_ids
            .iter()
            .map(|id| PdfObject::Reference(*id))
            .collect();
        let pages = PdfObject::dict(vec![
            ("Type", PdfObject::name("Pages")),
            ("Kids", PdfObject::Array(kids)),
            ("Count", PdfObject::Integer(self.page_obj_ids.len() as i64)),
        ]);
        self.writer.write_object(PAGES_OBJ, &pages)?;

        let catalog = PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PdfObject::Reference(PAGES_OBJ)),
        ]);
        self.writer.write_object(CATALOG_OBJ, &catalog)?;

        self.writer.write_xref_and_trailer(CATALOG_OBJ, info_id)?;
        Ok(self.writer.into_inner())
    }
}

fn image_dict(
    width: u32,
    height: u32,
    color_space: &str,
    filter: &str,
) -> Vec<(&'static str, PdfObject)> {
    vec![
        ("Type", PdfObject::name("XObject")),
        ("Subtype", PdfObject::name("Image")),
        ("Width", PdfObject::Integer(width as i64)),
        ("Height", PdfObject::Integer(height as i64)),
        ("ColorSpace", PdfObject::name(color_space)),
        ("BitsPerComponent", PdfObject::Integer(8)),
        ("Filter", PdfObject::name(filter)),
    ]
}

fn deflate(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Format a coordinate value for PDF content streams.
pub(crate) fn format_coord(v: f64) -> String {
    if v == v.floor() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.4}", v);
        let s = s.trim_end_matches('0').trim_end_matches('.');
        if s == "-0" {
            "0".to_string()
        } else {
            s.to_string()
        }
    }
}
