//! Class-signature tables
//!
//! The blog's editor emits hashed class names rather than semantic markup, so
//! every role (heading level, paragraph, list item) is recognised by a set of
//! classes that must all be present on the element. The hashes change when the
//! editor is upgraded; each known generation is kept as a versioned table.

use crate::extract::block::HeadingLevel;
use std::collections::HashSet;

/// A set of classes that must all appear on an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    classes: &'static [&'static str],
}

impl Signature {
    pub const fn new(classes: &'static [&'static str]) -> Self {
        Self { classes }
    }

    /// True when every class of the signature is a token of `class_attr`
    pub fn matches(&self, class_attr: &str) -> bool {
        let tokens: HashSet<&str> = class_attr.split_whitespace().collect();
        self.classes.iter().all(|class| tokens.contains(class))
    }

    /// Compound class selector, e.g. `.a.b.c`
    pub fn selector(&self) -> String {
        self.classes.iter().map(|class| format!(".{}", class)).collect()
    }
}

/// Selectors on the paginated listing
#[derive(Debug, Clone, Copy)]
pub struct ListingSelectors {
    pub thumbnails: &'static str,
    pub post_links: &'static str,
}

/// Selectors for post metadata
#[derive(Debug, Clone, Copy)]
pub struct MetadataSelectors {
    pub author: &'static str,
    pub title: &'static str,
    pub date: &'static str,
    pub tags: &'static str,
}

/// Everything needed to read one generation of the site's markup
#[derive(Debug)]
pub struct SiteSignatures {
    pub version: &'static str,

    /// Selector for content images
    pub image: &'static str,

    headings: &'static [(u8, &'static [Signature])],
    paragraphs: &'static [Signature],
    list_items: &'static [Signature],

    pub listing: ListingSelectors,
    pub metadata: MetadataSelectors,

    /// Floating overlays hidden before extraction
    pub overlays: &'static str,
}

const LISTING: ListingSelectors = ListingSelectors {
    thumbnails: "img.gallery-item",
    post_links: ".gallery-item-container a",
};

const METADATA: MetadataSelectors = MetadataSelectors {
    author: ".tQ0Q1A.user-name.dlINDG",
    title: ".post-title",
    date: ".post-metadata__date",
    tags: ".ZjhmPV",
};

const OVERLAYS: &str = ".MS7sOC, .nITq6z";

const H4: Signature = Signature::new(&["BmTdM", "NfA7j", "rIsue", "QMtOy"]);
const H5: Signature = Signature::new(&["lWgvw", "NfA7j", "rIsue", "QMtOy"]);
const H6: Signature = Signature::new(&["ORfsN", "NfA7j", "rIsue", "QMtOy"]);

static V2: SiteSignatures = SiteSignatures {
    version: "v2",
    image: "wow-image img",
    headings: &[
        (2, &[Signature::new(&["edXX-", "QdIE9", "sw7z0", "bfpEf"])]),
        (
            3,
            &[
                Signature::new(&["wthqs", "QdIE9", "sw7z0", "bfpEf"]),
                Signature::new(&["_6Aw8R", "NfA7j", "rIsue", "QMtOy"]),
                Signature::new(&["qAx9-", "NfA7j", "rIsue", "QMtOy"]),
            ],
        ),
        (4, &[H4]),
        (5, &[H5]),
        (6, &[H6]),
    ],
    paragraphs: &[
        Signature::new(&["-XFiF", "FMjBj", "sw7z0", "bfpEf"]),
        Signature::new(&["-XFiF", "FMjBj", "omz53", "bfpEf"]),
        Signature::new(&["Is4xI", "aaZkV", "rIsue", "QMtOy"]),
        Signature::new(&["Is4xI", "aaZkV", "HZbzS", "QMtOy"]),
    ],
    list_items: &[Signature::new(&["NdNAj"]), Signature::new(&["B229E"])],
    listing: LISTING,
    metadata: METADATA,
    overlays: OVERLAYS,
};

static V1: SiteSignatures = SiteSignatures {
    version: "v1",
    image: "wow-image img",
    headings: &[
        (2, &[Signature::new(&["_6Aw8R", "NfA7j", "rIsue", "QMtOy"])]),
        (3, &[Signature::new(&["qAx9-", "NfA7j", "rIsue", "QMtOy"])]),
        (4, &[H4]),
        (5, &[H5]),
        (6, &[H6]),
    ],
    paragraphs: &[
        Signature::new(&["Is4xI", "aaZkV", "rIsue", "QMtOy"]),
        Signature::new(&["vsfWl"]),
    ],
    list_items: &[Signature::new(&["B229E"])],
    listing: LISTING,
    metadata: METADATA,
    overlays: OVERLAYS,
};

static ALL: &[&SiteSignatures] = &[&V2, &V1];

impl SiteSignatures {
    /// Looks up a built-in table by version name
    pub fn for_version(version: &str) -> Option<&'static SiteSignatures> {
        ALL.iter().copied().find(|table| table.version == version)
    }

    pub fn known_versions() -> Vec<&'static str> {
        ALL.iter().map(|table| table.version).collect()
    }

    /// The current table
    pub fn latest() -> &'static SiteSignatures {
        &V2
    }

    /// One selector covering images, headings, paragraphs and list items
    pub fn content_selector(&self) -> String {
        let mut parts = vec![self.image.to_string()];
        parts.extend(
            self.headings
                .iter()
                .flat_map(|(_, signatures)| signatures.iter())
                .chain(self.paragraphs)
                .chain(self.list_items)
                .map(Signature::selector),
        );
        parts.join(", ")
    }

    /// Heading level whose signature `class_attr` carries, if any
    pub fn heading_level(&self, class_attr: &str) -> Option<HeadingLevel> {
        self.headings
            .iter()
            .find(|(_, signatures)| signatures.iter().any(|s| s.matches(class_attr)))
            .and_then(|(level, _)| HeadingLevel::new(*level))
    }

    pub fn is_list_item(&self, class_attr: &str) -> bool {
        self.list_items.iter().any(|s| s.matches(class_attr))
    }
}
