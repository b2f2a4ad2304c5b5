//! Entry import and start-list export.
//!
//! The draw core touches these edges only through `Vec<Entry>` in and
//! `StartList` out; formats are selected by configuration.

pub mod json;
pub mod xml;

pub use json::{JsonExporter, JsonImporter};
pub use xml::{XmlExporter, XmlStartListCreator};
