//! pleadr generates pleading paper court filings as PDF documents from a JSON description of
//! their content. Pleading paper is the page format required by certain courts: line numbers 1 to
//! 28 down the left margin, vertical rules separating them from the text, and text placed on those
//! numbered lines.
//!
//! A filing is described by a `PleadingDocument` (see the `document` module), which lists for each
//! page the elements to be placed on numbered lines. The page geometry is described separately by a
//! `PleadingConfiguration`, so that the same document can be rendered onto a differently
//! configured grid without touching its content.

/// The module where the `PleadingDocument` interface is presented.
///
/// # Introduction
///
/// A `PleadingDocument` is read from a JSON file and consists of a title, an optional document
/// identifier and author, and a list of pages. Each page lists its elements: text, runs of
/// differently styled text, wrapped paragraphs, rules, underlined fields and caption boxes. All
/// of them are placed on numbered lines of the grid, which is why the document itself carries no
/// coordinates unless an element asks for an explicit horizontal position.
///
/// The method `to_pdf_document` draws the background of every page followed by its elements into
/// a `PdfDocument`, which can then be written and saved. Text running past the right margin is
/// still drawn, but a warning is logged naming the page and the line. The exhibits of a document,
/// pages of existing PDF files, are appended once it has been written.
pub mod document;

/// This module contains the `ContextError` type which is the error type used throughout this library.
///
/// Every fallible function returns a `ContextError` describing what was being attempted, such as
/// the file being read or the page and line being drawn. When the failure originated in another
/// error, its message is kept as well, so that the whole chain can be printed in one line.
pub mod error;

/// The module where the `PdfDocument` interface for working with PDF documents is presented.
///
/// # Introduction
///
/// A `PdfDocument` collects pages and the content operations drawn on each of them, and only
/// assembles the underlying `lopdf::Document` when `write_all` is called. Text is always written
/// with an explicit `TextStyle` (font and size): there is no "current font" carried between calls.
///
/// The documents are deterministic, the identifier and the creation date being provided by the
/// caller, which makes the output of the crate reproducible and testable.
pub mod pdf;

/// Fonts usable in a document: the standard PDF fonts, which are never embedded, and TrueType
/// fonts, which are embedded along with a `ToUnicode` map so that text can still be extracted.
pub mod font;

pub mod metrics;

/// The numbered lines of a pleading page and their baselines.
pub mod grid;

/// The geometry of pleading pages, read from a JSON configuration file in which every field
/// is optional.
pub mod configuration;

/// Drawing of the pleading paper itself: line numbers, rules and footer.
pub mod background;

/// Writing of styled runs onto numbered lines.
pub mod writer;

/// Existing PDF documents appended after a filing.
pub mod exhibit;
