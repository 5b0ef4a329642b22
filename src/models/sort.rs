use std::cmp::Ordering;

use feruca::Collator;
use serde::{Deserialize, Serialize};

use super::Note;

/// Presentation order for note lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Newest first by creation time
    Created,
    /// Most recently edited first
    #[default]
    Edited,
    /// Title A to Z
    Title,
    /// Title Z to A
    TitleDesc,
}

impl SortOrder {
    pub const ALL: &'static [SortOrder] = &[
        SortOrder::Edited,
        SortOrder::Created,
        SortOrder::Title,
        SortOrder::TitleDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Edited => "edited",
            Self::Title => "title",
            Self::TitleDesc => "title-desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Created => "Date created",
            Self::Edited => "Last edited",
            Self::Title => "Title (A-Z)",
            Self::TitleDesc => "Title (Z-A)",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "created" => Some(Self::Created),
            "edited" | "last-edited" | "lastedited" | "updated" => Some(Self::Edited),
            "title" | "title-asc" | "asc" => Some(Self::Title),
            "title-desc" | "desc" => Some(Self::TitleDesc),
            _ => None,
        }
    }

    /// Sort in place. `sort_by` is stable, so notes that compare equal keep
    /// their insertion order.
    pub fn sort(&self, notes: &mut [&Note]) {
        match self {
            Self::Created => notes.sort_by(|a, b| b.created.cmp(&a.created)),
            Self::Edited => notes.sort_by(|a, b| b.last_edited.cmp(&a.last_edited)),
            Self::Title => {
                let mut collator = Collator::default();
                notes.sort_by(|a, b| compare_titles(&mut collator, &a.title, &b.title))
            }
            Self::TitleDesc => {
                let mut collator = Collator::default();
                notes.sort_by(|a, b| compare_titles(&mut collator, &b.title, &a.title))
            }
        }
    }
}

/// Locale-aware comparison (Unicode collation, CLDR root order), with the
/// raw text as tie-break so distinct titles always have a strict order.
pub(crate) fn compare_titles(collator: &mut Collator, a: &str, b: &str) -> Ordering {
    collator.collate(a, b).then_with(|| a.cmp(b))
}
