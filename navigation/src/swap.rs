//! Content swapper.

use crate::document::{DestinationDocument, MetaTag};
use crate::error::DomError;
use crate::page::Document;

/// Which region a swap replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapMode {
    /// Only the primary-content landmark.
    Landmark,
    /// The whole body (one of the documents had no landmark).
    WholeBody,
}

/// Installs `destination` into the live document: title, then content,
/// then metadata, then scroll to top.
///
/// There is no rollback. An error leaves the live document partly updated
/// and the caller must abandon the page (hard navigation).
///
/// # Errors
///
/// Returns the first [`DomError`] raised by the live document.
pub fn swap<D: Document + ?Sized>(
    live: &mut D,
    destination: &DestinationDocument,
    landmark: &str,
) -> Result<SwapMode, DomError> {
    live.set_title(&destination.title)?;

    let mode = match &destination.primary_content {
        Some(inner) if live.has_landmark(landmark) => {
            live.replace_landmark(landmark, inner)?;
            SwapMode::Landmark
        }
        _ => {
            live.replace_body(&destination.body)?;
            SwapMode::WholeBody
        }
    };

    copy_metadata(live, destination)?;
    live.scroll_to_top();
    Ok(mode)
}

/// Copies each metadata value present on both sides. Tags missing on
/// either side are left alone: never created, never cleared.
fn copy_metadata<D: Document + ?Sized>(
    live: &mut D,
    destination: &DestinationDocument,
) -> Result<(), DomError> {
    for tag in MetaTag::ALL {
        let Some(content) = destination.metadata.get(&tag) else {
            continue;
        };
        if live.meta_content(tag).is_some() {
            live.set_meta_content(tag, content)?;
        }
    }
    Ok(())
}
