//! Receipt scanning: OCR text interpretation and form prefill

pub mod draft;
pub mod parser;
pub mod scan;

pub use draft::*;
pub use parser::*;
pub use scan::*;
