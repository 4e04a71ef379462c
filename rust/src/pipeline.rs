//! Backup and restore orchestration.
//!
//! Backup: validate settings, hash the payload, split it, encode every
//! fragment, lay the images out and hand them to the renderer. Restore runs
//! the other way: join scanned fragments in the order given, check the
//! digest, and decode the base64 text back into the encrypted key.
//!
//! Any failure ends the run. Files already written to the output directory
//! are left in place.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;
use tracing::{debug, info};

use crate::codec::chunker::{self, ChunkError};
use crate::codec::tag::{self, Digest, TagError};
use crate::config::{BackupConfig, ConfigError};
use crate::layout::{grid, Layout, LayoutError};
use crate::render::{BarcodeEncoder, BarcodeError, DocumentRenderer, FooterInfo, RenderError};

/// Height in mm kept free at the bottom of a labelled cell. The code is shrunk
/// by this much so the "i/N" label never touches the symbol or its quiet zone.
pub const LABEL_BAND: f64 = 3.0;
/// Gap between the label baseline and the bottom of the cell, in mm.
const LABEL_DESCENT: f64 = 0.6;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),
    #[error("cannot split payload: {0}")]
    Chunk(#[from] ChunkError),
    #[error("qr encoding failed for fragment {index}: {source}")]
    Barcode {
        index: usize,
        #[source]
        source: BarcodeError,
    },
    #[error("pdf rendering failed: {0}")]
    Render(#[from] RenderError),
    #[error(transparent)]
    Integrity(#[from] TagError),
    #[error("payload is not valid base64: {0}")]
    Decode(String),
    #[error("no fragments given")]
    NoFragments,
    #[error("fragment {0} is empty")]
    EmptyFragment(String),
    #[error("unable to read {path}: {message}")]
    Read { path: String, message: String },
    #[error("unable to write {path}: {message}")]
    Write { path: String, message: String },
}

/// Inputs of one backup run.
#[derive(Debug, Clone, Copy)]
pub struct BackupRequest<'a> {
    /// Base64 text of the encrypted key.
    pub payload: &'a str,
    pub fingerprint: &'a str,
    pub out_dir: &'a Path,
    pub config: &'a BackupConfig,
}

/// What a backup run produced.
#[derive(Debug, Clone)]
pub struct BackupArtifacts {
    pub digest: Digest,
    pub fragments: usize,
    pub pages: usize,
    pub pdf: PathBuf,
    pub images: Vec<PathBuf>,
    pub text: Option<PathBuf>,
}

/// A reconstructed payload.
#[derive(Debug, Clone)]
pub struct Restored {
    pub payload: String,
    pub digest: Digest,
    pub encrypted: Vec<u8>,
}

/// Base64 (standard alphabet, padded) so the ciphertext fits QR byte mode as text.
pub fn encode_payload(encrypted: &[u8]) -> String {
    STANDARD.encode(encrypted)
}

pub fn decode_payload(payload: &str) -> Result<Vec<u8>, PipelineError> {
    STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| PipelineError::Decode(format!("{e}")))
}

/// Common prefix of every artifact written for one key.
pub fn file_stem(fingerprint: &str) -> String {
    format!("qrbak_{}", fingerprint.to_lowercase())
}

pub fn run_backup<E, R>(
    request: BackupRequest<'_>,
    encoder: &E,
    renderer: &mut R,
) -> Result<BackupArtifacts, PipelineError>
where
    E: BarcodeEncoder + ?Sized,
    R: DocumentRenderer + ?Sized,
{
    let BackupRequest {
        payload,
        fingerprint,
        out_dir,
        config,
    } = request;

    config.validate()?;
    let layout_config = config.layout_config()?;

    let digest = tag::digest(payload);
    let fragments = chunker::split_checked(payload, config.codes)?;
    info!(
        payload_len = payload.len(),
        fragments = fragments.len(),
        digest = %digest.short(),
        "split payload"
    );

    fs::create_dir_all(out_dir).map_err(|e| write_error(out_dir, e))?;
    let stem = file_stem(fingerprint);

    let mut images = Vec::with_capacity(fragments.len());
    let mut image_paths = Vec::new();
    for (index, fragment) in fragments.iter().enumerate() {
        debug!(index, len = fragment.len(), "encoding fragment");
        let png = encoder
            .encode(fragment)
            .map_err(|source| PipelineError::Barcode { index, source })?;
        if config.save_images {
            let path = out_dir.join(format!("{stem}_{index}.png"));
            write_private(&path, &png)?;
            image_paths.push(path);
        }
        images.push(png);
    }

    let text = if config.save_text {
        let path = out_dir.join(format!("{stem}.txt"));
        write_private(&path, payload.as_bytes())?;
        Some(path)
    } else {
        None
    };

    let layout = grid::layout(images.len(), &layout_config);
    debug!(
        pages = layout.pages,
        codes_per_page = layout_config.rows_per_page() * layout_config.columns_per_row(),
        "laid out codes"
    );
    let footer = FooterInfo::new(digest, fingerprint);
    render_document(&images, &layout, &footer, config.label_codes, renderer)?;

    let pdf = out_dir.join(format!("{stem}.pdf"));
    renderer.finalize(&pdf)?;
    restrict_to_owner(&pdf)?;
    info!(path = %pdf.display(), pages = layout.pages, "wrote pdf");

    Ok(BackupArtifacts {
        digest,
        fragments: fragments.len(),
        pages: layout.pages,
        pdf,
        images: image_paths,
        text,
    })
}

/// Replays a layout onto a renderer: pages in order, images at their cells,
/// then one footer per page.
pub fn render_document<R>(
    images: &[Vec<u8>],
    layout: &Layout,
    footer: &FooterInfo,
    label_codes: bool,
    renderer: &mut R,
) -> Result<(), RenderError>
where
    R: DocumentRenderer + ?Sized,
{
    let total = images.len();
    renderer.add_page()?;
    let mut page = 1;

    for cell in &layout.cells {
        while page < cell.page {
            renderer.add_page()?;
            page += 1;
        }
        let png = images
            .get(cell.index)
            .ok_or_else(|| RenderError::Image(format!("no image for cell {}", cell.index)))?;
        if label_codes {
            let size = cell.width - LABEL_BAND;
            if size <= 0.0 {
                return Err(RenderError::Image(format!(
                    "a {:.1} mm cell leaves no room for a labelled code",
                    cell.width
                )));
            }
            let x = cell.x + LABEL_BAND / 2.0;
            renderer.place_image(png, x, cell.y, size)?;
            let label = format!("{}/{}", cell.index + 1, total);
            renderer.place_label(&label, x, cell.y + cell.width - LABEL_DESCENT)?;
        } else {
            renderer.place_image(png, cell.x, cell.y, cell.width)?;
        }
    }

    for page in 1..=layout.pages {
        renderer.set_footer(page, &footer.lines(page, layout.pages))?;
    }
    Ok(())
}

/// Reads scanned fragments, one per file, dropping the trailing line break a
/// scanner app or editor may add.
pub fn read_fragments<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<String>, PipelineError> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let text = fs::read_to_string(path).map_err(|e| PipelineError::Read {
                path: path.display().to_string(),
                message: format!("{e}"),
            })?;
            let fragment = text.trim_end_matches(['\r', '\n']).to_string();
            if fragment.is_empty() {
                return Err(PipelineError::EmptyFragment(path.display().to_string()));
            }
            Ok(fragment)
        })
        .collect()
}

/// Joins fragments in the given order and, when `expected_digest` is set,
/// checks the result before decoding.
pub fn restore<S: AsRef<str>>(
    fragments: &[S],
    expected_digest: Option<&str>,
) -> Result<Restored, PipelineError> {
    if fragments.is_empty() {
        return Err(PipelineError::NoFragments);
    }

    let payload = chunker::join(fragments);
    let digest = tag::digest(&payload);
    debug!(fragments = fragments.len(), payload_len = payload.len(), digest = %digest.short(), "joined fragments");
    if let Some(expected) = expected_digest {
        tag::verify_hex(&digest, expected)?;
    }

    let encrypted = decode_payload(&payload)?;
    Ok(Restored {
        payload,
        digest,
        encrypted,
    })
}

/// Writes a file readable only by its owner where the platform allows it.
/// An existing file is truncated and has its mode tightened as well.
pub fn write_private(path: &Path, bytes: &[u8]) -> Result<(), PipelineError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(|e| write_error(path, e))?;
    restrict_to_owner(path)?;
    file.write_all(bytes).map_err(|e| write_error(path, e))?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote file");
    Ok(())
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) -> Result<(), PipelineError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|e| write_error(path, e))
}

#[cfg(not(unix))]
fn restrict_to_owner(_path: &Path) -> Result<(), PipelineError> {
    Ok(())
}

fn write_error(path: &Path, err: std::io::Error) -> PipelineError {
    PipelineError::Write {
        path: path.display().to_string(),
        message: format!("{err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::chunker::split;
    use crate::layout::{LayoutConfig, PageSize};
    use crate::render::pdf::label_height;
    use crate::render::{PdfRenderer, QrEncoder};
    use std::cell::Cell;
    use tempfile::tempdir;

    const FINGERPRINT: &str = "0123456789ABCDEF0123456789ABCDEF01234567";

    /// Hands the fragment text back as the "image".
    #[derive(Default)]
    struct EchoEncoder {
        calls: Cell<usize>,
        fail_at: Option<usize>,
    }

    impl BarcodeEncoder for EchoEncoder {
        fn encode(&self, text: &str) -> Result<Vec<u8>, BarcodeError> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            if self.fail_at == Some(call) {
                return Err(BarcodeError::Encode("data too long".to_string()));
            }
            Ok(text.as_bytes().to_vec())
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Page,
        Image { bytes: Vec<u8>, x: f64, y: f64, width: f64 },
        Label { text: String, x: f64, y: f64 },
        Footer(usize, Vec<String>),
        Finalize(PathBuf),
    }

    #[derive(Default)]
    struct RecordingRenderer {
        events: Vec<Event>,
    }

    impl RecordingRenderer {
        fn images(&self) -> Vec<Vec<u8>> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Image { bytes, .. } => Some(bytes.clone()),
                    _ => None,
                })
                .collect()
        }

        fn count(&self, wanted: fn(&Event) -> bool) -> usize {
            self.events.iter().filter(|e| wanted(e)).count()
        }
    }

    impl DocumentRenderer for RecordingRenderer {
        fn add_page(&mut self) -> Result<(), RenderError> {
            self.events.push(Event::Page);
            Ok(())
        }

        fn place_image(&mut self, png: &[u8], x: f64, y: f64, width: f64) -> Result<(), RenderError> {
            self.events.push(Event::Image {
                bytes: png.to_vec(),
                x,
                y,
                width,
            });
            Ok(())
        }

        fn place_label(&mut self, text: &str, x: f64, y: f64) -> Result<(), RenderError> {
            self.events.push(Event::Label {
                text: text.to_string(),
                x,
                y,
            });
            Ok(())
        }

        fn set_footer(&mut self, page: usize, lines: &[String]) -> Result<(), RenderError> {
            self.events.push(Event::Footer(page, lines.to_vec()));
            Ok(())
        }

        fn page_count(&self) -> usize {
            self.count(|e| matches!(e, Event::Page))
        }

        fn finalize(&mut self, path: &Path) -> Result<(), RenderError> {
            self.events.push(Event::Finalize(path.to_path_buf()));
            fs::write(path, b"%PDF").map_err(|e| RenderError::Io {
                path: path.display().to_string(),
                message: format!("{e}"),
            })
        }
    }

    fn config(codes: usize) -> BackupConfig {
        BackupConfig {
            codes,
            ..BackupConfig::default()
        }
    }

    #[test]
    fn places_fragments_in_order() {
        let dir = tempdir().unwrap();
        let config = config(3);
        let encoder = EchoEncoder::default();
        let mut renderer = RecordingRenderer::default();
        let request = BackupRequest {
            payload: "foobarbazz",
            fingerprint: FINGERPRINT,
            out_dir: dir.path(),
            config: &config,
        };

        let artifacts = run_backup(request, &encoder, &mut renderer).expect("backup should succeed");
        assert_eq!(artifacts.fragments, 3);
        assert_eq!(artifacts.pages, 1);
        assert_eq!(artifacts.digest, tag::digest("foobarbazz"));
        assert_eq!(
            renderer.images(),
            vec![b"foob".to_vec(), b"arba".to_vec(), b"zz".to_vec()]
        );

        let labels: Vec<&str> = renderer
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Label { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["1/3", "2/3", "3/3"]);

        let stem = format!("qrbak_{}", FINGERPRINT.to_lowercase());
        assert_eq!(artifacts.pdf, dir.path().join(format!("{stem}.pdf")));
        assert_eq!(renderer.events.last(), Some(&Event::Finalize(artifacts.pdf.clone())));
        assert!(artifacts.images.is_empty());
        assert!(artifacts.text.is_none());
    }

    #[test]
    fn spreads_codes_over_pages() {
        let dir = tempdir().unwrap();
        let config = BackupConfig {
            label_codes: false,
            ..config(27)
        };
        let payload = "A".repeat(27 * 40);
        let mut renderer = RecordingRenderer::default();
        let request = BackupRequest {
            payload: &payload,
            fingerprint: FINGERPRINT,
            out_dir: dir.path(),
            config: &config,
        };

        let artifacts = run_backup(request, &EchoEncoder::default(), &mut renderer).unwrap();
        assert_eq!(artifacts.pages, 3);
        assert_eq!(renderer.page_count(), 3);
        assert_eq!(renderer.count(|e| matches!(e, Event::Label { .. })), 0);

        // Nine codes per Letter page: the tenth image follows the second page break.
        let second_page = renderer
            .events
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, Event::Page))
            .nth(1)
            .map(|(i, _)| i)
            .unwrap();
        let images_before = renderer.events[..second_page]
            .iter()
            .filter(|e| matches!(e, Event::Image { .. }))
            .count();
        assert_eq!(images_before, 9);
        match &renderer.events[second_page + 1] {
            Event::Image { x, y, .. } => assert_eq!((*x, *y), (10.0, 10.0)),
            other => panic!("expected an image after the page break, got {other:?}"),
        }

        let footers: Vec<&Event> = renderer
            .events
            .iter()
            .filter(|e| matches!(e, Event::Footer(..)))
            .collect();
        assert_eq!(footers.len(), 3);
        if let Event::Footer(page, lines) = footers[2] {
            assert_eq!(*page, 3);
            assert!(lines.iter().any(|l| l.contains("page 3 of 3")));
        }
    }

    /// Every label must sit below its code and inside its cell.
    fn assert_labels_clear_codes(events: &[Event], layout: &Layout) {
        let mut checked = 0;
        for pair in events.windows(2) {
            if let [Event::Image { x, y, width, .. }, Event::Label { x: lx, y: ly, .. }] = pair {
                let cell = &layout.cells[checked];
                checked += 1;
                assert!(ly - label_height() >= y + width, "label overlaps code {}", cell.index);
                assert!(*ly <= cell.y + cell.width);
                assert!(*lx >= cell.x);
                assert!(*x >= cell.x && x + width <= cell.x + cell.width);
            }
        }
        assert_eq!(checked, layout.cells.len());
    }

    fn render_labelled(images: &[Vec<u8>], config: &LayoutConfig) -> (Layout, RecordingRenderer) {
        let layout = grid::layout(images.len(), config);
        let footer = FooterInfo::new(tag::digest("payload"), FINGERPRINT);
        let mut renderer = RecordingRenderer::default();
        render_document(images, &layout, &footer, true, &mut renderer).unwrap();
        (layout, renderer)
    }

    #[test]
    fn label_band_fits_label() {
        assert!(label_height() + LABEL_DESCENT <= LABEL_BAND);
    }

    #[test]
    fn labels_stay_below_codes() {
        for (size, columns) in [(PageSize::Letter, 3), (PageSize::Letter, 4), (PageSize::A5, 2)] {
            let config = LayoutConfig::for_page_size(size, columns).unwrap();
            let images = vec![Vec::new(); 20];
            let (layout, renderer) = render_labelled(&images, &config);
            assert_labels_clear_codes(&renderer.events, &layout);
        }
    }

    #[test]
    fn labels_stay_below_long_fragments() {
        let payload = encode_payload(&[0x5a; 3000]);
        let fragments = split(&payload, 4);
        assert!(fragments[0].len() >= 1000);

        let encoder = QrEncoder::new(64);
        let images: Vec<Vec<u8>> = fragments.iter().map(|f| encoder.encode(f).unwrap()).collect();
        for png in &images {
            let decoded = image::load_from_memory(png).unwrap();
            assert_eq!(decoded.width(), decoded.height());
        }

        let config = LayoutConfig::for_page_size(PageSize::Letter, 4).unwrap();
        let (layout, renderer) = render_labelled(&images, &config);
        assert_labels_clear_codes(&renderer.events, &layout);
    }

    #[test]
    fn rejects_cells_too_small_for_a_label() {
        let small = Layout {
            cells: vec![crate::layout::Cell {
                index: 0,
                page: 1,
                row: 0,
                column: 0,
                x: 10.0,
                y: 10.0,
                width: 2.0,
            }],
            pages: 1,
        };
        let footer = FooterInfo::new(tag::digest("payload"), FINGERPRINT);
        let mut renderer = RecordingRenderer::default();
        let err = render_document(&[Vec::new()], &small, &footer, true, &mut renderer).unwrap_err();
        assert!(matches!(err, RenderError::Image(_)));
    }

    #[test]
    fn encoder_failure_names_the_fragment() {
        let dir = tempdir().unwrap();
        let config = config(4);
        let encoder = EchoEncoder {
            fail_at: Some(2),
            ..EchoEncoder::default()
        };
        let mut renderer = RecordingRenderer::default();
        let request = BackupRequest {
            payload: "foobarbazqux",
            fingerprint: FINGERPRINT,
            out_dir: dir.path(),
            config: &config,
        };

        let err = run_backup(request, &encoder, &mut renderer).unwrap_err();
        assert!(matches!(err, PipelineError::Barcode { index: 2, .. }));
        assert!(format!("{err}").contains("fragment 2"));
        assert!(renderer.events.is_empty());
    }

    #[test]
    fn rejects_bad_settings_before_encoding() {
        let dir = tempdir().unwrap();
        let encoder = EchoEncoder::default();
        let mut renderer = RecordingRenderer::default();

        for config in [
            config(0),
            BackupConfig {
                codes_per_row: 0,
                ..BackupConfig::default()
            },
            BackupConfig {
                qr_size: 10,
                ..BackupConfig::default()
            },
        ] {
            let request = BackupRequest {
                payload: "foobarbaz",
                fingerprint: FINGERPRINT,
                out_dir: dir.path(),
                config: &config,
            };
            assert!(run_backup(request, &encoder, &mut renderer).is_err());
        }

        let config = config(3);
        let request = BackupRequest {
            payload: "",
            fingerprint: FINGERPRINT,
            out_dir: dir.path(),
            config: &config,
        };
        let err = run_backup(request, &encoder, &mut renderer).unwrap_err();
        assert!(matches!(err, PipelineError::Chunk(ChunkError::EmptyPayload)));

        assert_eq!(encoder.calls.get(), 0);
        assert!(renderer.events.is_empty());
    }

    #[test]
    fn writes_optional_artifacts() {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("nested");
        let config = BackupConfig {
            save_images: true,
            save_text: true,
            ..config(3)
        };
        let request = BackupRequest {
            payload: "foobarbaz",
            fingerprint: FINGERPRINT,
            out_dir: &out_dir,
            config: &config,
        };

        let artifacts =
            run_backup(request, &EchoEncoder::default(), &mut RecordingRenderer::default()).unwrap();
        assert_eq!(artifacts.images.len(), 3);
        assert_eq!(fs::read(&artifacts.images[1]).unwrap(), b"bar");
        assert!(artifacts.images[2].ends_with(format!("{}_2.png", file_stem(FINGERPRINT))));

        let text = artifacts.text.expect("text artifact");
        assert_eq!(fs::read_to_string(&text).unwrap(), "foobarbaz");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&text).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[cfg(unix)]
    #[test]
    fn overwriting_tightens_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("key.txt");
        fs::write(&path, "an older, longer payload").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        write_private(&path, b"secret payload").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(fs::read(&path).unwrap(), b"secret payload");
    }

    #[test]
    fn restores_encrypted_bytes() {
        let encrypted: Vec<u8> = (0u8..=255).collect();
        let payload = encode_payload(&encrypted);
        let digest = tag::digest(&payload);
        let fragments = split(&payload, 7);

        let restored = restore(&fragments, Some(&digest.to_hex())).expect("restore should succeed");
        assert_eq!(restored.encrypted, encrypted);
        assert_eq!(restored.payload, payload);

        let restored = restore(&fragments, Some(&digest.short())).unwrap();
        assert_eq!(restored.digest, digest);
    }

    #[test]
    fn detects_misordered_fragments() {
        let payload = encode_payload(b"some encrypted key material");
        let digest = tag::digest(&payload);
        let mut fragments = split(&payload, 4);
        fragments.swap(1, 2);

        let err = restore(&fragments, Some(&digest.to_hex())).unwrap_err();
        assert!(matches!(err, PipelineError::Integrity(TagError::Mismatch { .. })));
    }

    #[test]
    fn restore_rejects_empty_and_garbled_input() {
        assert!(matches!(restore::<&str>(&[], None), Err(PipelineError::NoFragments)));
        assert!(matches!(restore(&["not base64!"], None), Err(PipelineError::Decode(_))));
    }

    #[test]
    fn reads_scanned_fragments() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("1.txt");
        let second = dir.path().join("2.txt");
        let blank = dir.path().join("3.txt");
        fs::write(&first, "Zm9v\n").unwrap();
        fs::write(&second, "YmFy\r\n").unwrap();
        fs::write(&blank, "\n").unwrap();

        assert_eq!(read_fragments(&[&first, &second]).unwrap(), vec!["Zm9v", "YmFy"]);
        assert!(matches!(
            read_fragments(&[&first, &blank]),
            Err(PipelineError::EmptyFragment(_))
        ));
        assert!(matches!(
            read_fragments(&[dir.path().join("missing.txt")]),
            Err(PipelineError::Read { .. })
        ));
    }

    #[test]
    fn renders_real_pdf() {
        let dir = tempdir().unwrap();
        let config = BackupConfig {
            codes: 12,
            page_size: PageSize::A5,
            codes_per_row: 4,
            qr_size: 128,
            ..BackupConfig::default()
        };
        let payload = encode_payload(&[7u8; 600]);
        let layout_config = config.layout_config().unwrap();
        let mut renderer = PdfRenderer::new(&layout_config, config.page_size.font_size());
        let request = BackupRequest {
            payload: &payload,
            fingerprint: FINGERPRINT,
            out_dir: dir.path(),
            config: &config,
        };

        let artifacts = run_backup(request, &QrEncoder::new(config.qr_size), &mut renderer).unwrap();
        let doc = lopdf::Document::load(&artifacts.pdf).expect("pdf should parse");
        assert_eq!(doc.get_pages().len(), artifacts.pages);
    }
}
