use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{error::ContextError, pdf::PdfDocument};

/// An existing PDF document whose pages follow the filing, such as a letter or a page of an
/// earlier brief.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Exhibit {
    pub path: PathBuf,
    /// The 1-indexed pages to append, all of them when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<u32>,
}

/// Appends the exhibits, in order, after the pages of a written document and returns the number
/// of appended pages. An exhibit which is missing or cannot be read is skipped with a warning, as
/// is a requested page the exhibit does not have, so that the filing itself is always produced.
pub fn append_exhibits(
    pdf_document: &mut PdfDocument,
    exhibits: &[Exhibit],
) -> Result<usize, ContextError> {
    let mut appended_page_count = 0;
    for exhibit in exhibits {
        if !exhibit.path.is_file() {
            log::warn!("The exhibit {:?} was not found, skipping it", exhibit.path);
            continue;
        }
        let exhibit_document = match lopdf::Document::load(&exhibit.path) {
            Ok(exhibit_document) => exhibit_document,
            Err(error) => {
                log::warn!(
                    "Failed to read the exhibit {:?}, skipping it: {}",
                    exhibit.path,
                    error
                );
                continue;
            }
        };

        let exhibit_page_count = exhibit_document.get_pages().len();
        let page_numbers: Vec<u32> = exhibit
            .pages
            .iter()
            .copied()
            .filter(|page_number| {
                let exists = *page_number >= 1 && *page_number as usize <= exhibit_page_count;
                if !exists {
                    log::warn!(
                        "The exhibit {:?} has {} pages, skipping its page {}",
                        exhibit.path,
                        exhibit_page_count,
                        page_number
                    );
                }
                exists
            })
            .collect();
        if !exhibit.pages.is_empty() && page_numbers.is_empty() {
            continue;
        }

        let appended = pdf_document
            .append_pages(exhibit_document, &page_numbers)
            .map_err(|error| {
                ContextError::with_error(
                    format!("Failed to append the exhibit {:?}", exhibit.path),
                    &error,
                )
            })?;
        log::debug!("Appended {} pages of {:?}", appended, exhibit.path);
        appended_page_count += appended;
    }

    Ok(appended_page_count)
}
