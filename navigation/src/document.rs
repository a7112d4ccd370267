//! Destination documents: what a soft navigation extracts from a fetched page.

use std::collections::BTreeMap;

use crate::dom::Dom;

/// Metadata tags carried across a soft navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetaTag {
    /// `meta[name=description]`
    Description,
    /// `meta[property=og:title]`
    OgTitle,
    /// `meta[property=og:description]`
    OgDescription,
    /// `meta[property=og:url]`
    OgUrl,
    /// `meta[property=og:image]`
    OgImage,
}

impl MetaTag {
    /// Every tag, in the order they are copied.
    pub const ALL: [MetaTag; 5] = [
        MetaTag::Description,
        MetaTag::OgTitle,
        MetaTag::OgDescription,
        MetaTag::OgUrl,
        MetaTag::OgImage,
    ];

    /// `(attribute, value)` pair that identifies the tag.
    pub const fn selector(self) -> (&'static str, &'static str) {
        match self {
            Self::Description => ("name", "description"),
            Self::OgTitle => ("property", "og:title"),
            Self::OgDescription => ("property", "og:description"),
            Self::OgUrl => ("property", "og:url"),
            Self::OgImage => ("property", "og:image"),
        }
    }
}

/// The parts of a fetched page a soft navigation needs.
///
/// The parsed tree is dropped as soon as these are extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationDocument {
    /// Document title (whitespace-collapsed).
    pub title: String,
    /// Inner markup of the primary-content landmark, if the page has one.
    pub primary_content: Option<String>,
    /// Inner markup of `<body>`, for the whole-body fallback.
    pub body: String,
    /// Content of each metadata tag the page carries. A tag without a
    /// `content` attribute maps to the empty string.
    pub metadata: BTreeMap<MetaTag, String>,
}

impl DestinationDocument {
    /// Parses `html` and extracts title, landmark, body and metadata.
    ///
    /// Serialization of a subtree cannot realistically fail for a tree the
    /// parser just built; if it does, that region is treated as absent.
    pub fn parse(html: &str, landmark: &str) -> Self {
        let dom = Dom::parse(html);

        let primary_content = dom
            .find(landmark)
            .and_then(|node| Dom::inner_html(&node).ok());
        let body = dom
            .find("body")
            .and_then(|node| Dom::inner_html(&node).ok())
            .unwrap_or_default();
        let metadata = MetaTag::ALL
            .into_iter()
            .filter_map(|tag| {
                dom.find_meta(tag).map(|node| {
                    (tag, Dom::attribute(&node, "content").unwrap_or_default())
                })
            })
            .collect();

        Self {
            title: dom.title(),
            primary_content,
            body,
            metadata,
        }
    }
}
