//! PDF output. Callers work in millimetres from the top-left corner of the
//! page; this module converts to PDF points with the origin at the bottom-left.

use std::mem;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use thiserror::Error;

use crate::layout::LayoutConfig;

const PT_PER_MM: f64 = 72.0 / 25.4;
/// Slightly more than the real 0.353 mm per point; gives airier footer lines.
const LINE_MM_PER_POINT: f64 = 0.37;
/// Point size of the per-code labels.
pub const LABEL_FONT_SIZE: f64 = 6.0;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no page has been added yet")]
    NoPage,
    #[error("page {0} does not exist")]
    PageOutOfRange(usize),
    #[error("image could not be decoded: {0}")]
    Image(String),
    #[error("pdf assembly failed: {0}")]
    Pdf(String),
    #[error("unable to write {path}: {message}")]
    Io { path: String, message: String },
}

/// Drawing surface used by the backup pipeline. Positions are millimetres from
/// the top-left corner of the current page.
pub trait DocumentRenderer {
    fn add_page(&mut self) -> Result<(), RenderError>;

    /// Draws an image scaled to `width`; its height follows the aspect ratio.
    fn place_image(&mut self, png: &[u8], x: f64, y: f64, width: f64) -> Result<(), RenderError>;

    /// Draws a small text label with its baseline at `y`.
    fn place_label(&mut self, text: &str, x: f64, y: f64) -> Result<(), RenderError>;

    /// Sets the footer of a 1-based page.
    fn set_footer(&mut self, page: usize, lines: &[String]) -> Result<(), RenderError>;

    fn page_count(&self) -> usize;

    fn finalize(&mut self, path: &Path) -> Result<(), RenderError>;
}

struct GrayImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[derive(Default)]
struct PdfPage {
    images: Vec<GrayImage>,
    operations: Vec<Operation>,
    footer: Vec<String>,
}

/// Builds the document in memory and writes it on [`DocumentRenderer::finalize`].
pub struct PdfRenderer {
    page_width: f64,
    page_height: f64,
    footer_left: f64,
    footer_top: f64,
    font_size: f64,
    pages: Vec<PdfPage>,
}

impl PdfRenderer {
    pub fn new(config: &LayoutConfig, font_size: f64) -> Self {
        Self {
            page_width: config.page_width(),
            page_height: config.page_height(),
            footer_left: config.content_left(),
            footer_top: config.content_bottom(),
            font_size,
            pages: Vec::new(),
        }
    }

    fn current_page(&mut self) -> Result<&mut PdfPage, RenderError> {
        self.pages.last_mut().ok_or(RenderError::NoPage)
    }

    fn footer_operations(&self, lines: &[String]) -> Vec<Operation> {
        let line_height = self.font_size * LINE_MM_PER_POINT;
        lines
            .iter()
            .enumerate()
            .flat_map(|(i, line)| {
                let baseline = self.footer_top + (i + 1) as f64 * line_height;
                text_operations(
                    line,
                    self.font_size,
                    to_points(self.footer_left),
                    to_points(self.page_height - baseline),
                )
            })
            .collect()
    }
}

impl DocumentRenderer for PdfRenderer {
    fn add_page(&mut self) -> Result<(), RenderError> {
        self.pages.push(PdfPage::default());
        Ok(())
    }

    fn place_image(&mut self, png: &[u8], x: f64, y: f64, width: f64) -> Result<(), RenderError> {
        let decoded = image::load_from_memory(png)
            .map_err(|e| RenderError::Image(format!("{e}")))?
            .to_luma8();
        let (width_px, height_px) = decoded.dimensions();
        if width_px == 0 || height_px == 0 {
            return Err(RenderError::Image("image has no pixels".to_string()));
        }
        let height = width * f64::from(height_px) / f64::from(width_px);
        let bottom = self.page_height - y - height;

        let page = self.current_page()?;
        let name = format!("Im{}", page.images.len());
        page.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(to_points(width)),
                    Object::Integer(0),
                    Object::Integer(0),
                    real(to_points(height)),
                    real(to_points(x)),
                    real(to_points(bottom)),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ]);
        page.images.push(GrayImage {
            width: width_px,
            height: height_px,
            pixels: decoded.into_raw(),
        });
        Ok(())
    }

    fn place_label(&mut self, text: &str, x: f64, y: f64) -> Result<(), RenderError> {
        let baseline = self.page_height - y;
        let page = self.current_page()?;
        page.operations
            .extend(text_operations(text, LABEL_FONT_SIZE, to_points(x), to_points(baseline)));
        Ok(())
    }

    fn set_footer(&mut self, page: usize, lines: &[String]) -> Result<(), RenderError> {
        let target = page
            .checked_sub(1)
            .and_then(|i| self.pages.get_mut(i))
            .ok_or(RenderError::PageOutOfRange(page))?;
        target.footer = lines.to_vec();
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn finalize(&mut self, path: &Path) -> Result<(), RenderError> {
        if self.pages.is_empty() {
            return Err(RenderError::NoPage);
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let media_box: Vec<Object> = vec![
            Object::Integer(0),
            Object::Integer(0),
            real(to_points(self.page_width)),
            real(to_points(self.page_height)),
        ];

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for page in mem::take(&mut self.pages) {
            let mut xobjects = Dictionary::new();
            for (i, image) in page.images.into_iter().enumerate() {
                let stream = Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Image",
                        "Width" => i64::from(image.width),
                        "Height" => i64::from(image.height),
                        "ColorSpace" => "DeviceGray",
                        "BitsPerComponent" => 8_i64,
                    },
                    image.pixels,
                );
                let image_id = doc.add_object(stream);
                xobjects.set(format!("Im{i}"), image_id);
            }

            let mut operations = page.operations;
            operations.extend(self.footer_operations(&page.footer));
            let content = Content { operations }
                .encode()
                .map_err(|e| RenderError::Pdf(format!("{e}")))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => media_box.clone(),
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                    "XObject" => xobjects,
                },
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        doc.save(path).map_err(|e| RenderError::Io {
            path: path.display().to_string(),
            message: format!("{e}"),
        })?;
        Ok(())
    }
}

fn to_points(mm: f64) -> f64 {
    mm * PT_PER_MM
}

/// Height of a label line in mm, the full em box.
pub fn label_height() -> f64 {
    LABEL_FONT_SIZE / PT_PER_MM
}

fn real(value: f64) -> Object {
    Object::Real((value as f32).into())
}

fn text_operations(text: &str, size: f64, x: f64, y: f64) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), real(size)]),
        Operation::new("Td", vec![real(x), real(y)]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}
