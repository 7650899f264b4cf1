//! VVAIS classifiers shared by inventory validation and API responses.
//!
//! Values are stored verbatim in the database, so the Latvian spellings are
//! part of the data format.

#[cfg(test)]
#[path = "classifier_test.rs"]
mod tests;

/// Record type of an inventory list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VvaisType {
    Photo,
    Audio,
    Textual,
    Video,
    Database,
}

impl VvaisType {
    pub const ALL: [Self; 5] = [Self::Photo, Self::Audio, Self::Textual, Self::Video, Self::Database];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Photo => "foto",
            Self::Audio => "skaņas",
            Self::Textual => "tekstuāls",
            Self::Video => "video",
            Self::Database => "datubāze",
        }
    }

    #[must_use]
    pub fn from_str(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

/// Carrier medium; inventories record it as the `electronic` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VvaisMedia {
    Paper,
    Electronic,
}

impl VvaisMedia {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paper => "papīrs",
            Self::Electronic => "elektronisks",
        }
    }

    #[must_use]
    pub fn from_electronic(electronic: bool) -> Self {
        if electronic { Self::Electronic } else { Self::Paper }
    }
}

/// Retention class of the records in an inventory list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageTerm {
    Permanent,
    LongTerm,
}

impl StorageTerm {
    pub const ALL: [Self; 2] = [Self::Permanent, Self::LongTerm];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Permanent => "Pastāvīgi glabājamās lietas",
            Self::LongTerm => "Ilgstoši glabājamās lietas",
        }
    }

    #[must_use]
    pub fn from_str(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}
