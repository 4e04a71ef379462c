//! Output collaborators. The backup pipeline only talks to the traits defined
//! here, so tests can swap in fakes and never produce real images or PDFs.

pub mod barcode;
pub mod footer;
pub mod pdf;

pub use barcode::{BarcodeEncoder, BarcodeError, QrEncoder};
pub use footer::FooterInfo;
pub use pdf::{DocumentRenderer, PdfRenderer, RenderError};
