use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Grammatical gender of a noun, used to pick the indefinite article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Masculine,
    Feminine,
    Neuter,
}

/// Linguistic metadata for one countable icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Noun {
    pub singular: &'static str,
    pub plural: &'static str,
    pub gender: Gender,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown object kind: {raw:?}")]
pub struct ParseObjectKindError {
    raw: String,
}

//
// ─── OBJECT KIND ──────────────────────────────────────────────────────────────
//

/// A countable icon the child can pick.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    #[default]
    Balloon,
    Star,
    Apple,
    PuzzlePiece,
    Ladybug,
    Dot,
    Flower,
    House,
}

impl ObjectKind {
    /// Every kind in presentation order.
    pub const ALL: [ObjectKind; 8] = [
        ObjectKind::Balloon,
        ObjectKind::Star,
        ObjectKind::Apple,
        ObjectKind::PuzzlePiece,
        ObjectKind::Ladybug,
        ObjectKind::Dot,
        ObjectKind::Flower,
        ObjectKind::House,
    ];

    #[must_use]
    pub fn noun(self) -> Noun {
        use Gender::{Feminine, Masculine, Neuter};
        let (singular, plural, gender) = match self {
            ObjectKind::Balloon => ("Ballon", "Ballons", Masculine),
            ObjectKind::Star => ("Stern", "Sterne", Masculine),
            ObjectKind::Apple => ("Apfel", "Äpfel", Masculine),
            ObjectKind::PuzzlePiece => ("Puzzleteil", "Puzzleteile", Neuter),
            ObjectKind::Ladybug => ("Marienkäfer", "Marienkäfer", Masculine),
            ObjectKind::Dot => ("Punkt", "Punkte", Masculine),
            ObjectKind::Flower => ("Blume", "Blumen", Feminine),
            ObjectKind::House => ("Haus", "Häuser", Neuter),
        };
        Noun {
            singular,
            plural,
            gender,
        }
    }

    /// Icon rendered for this kind.
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            ObjectKind::Balloon => "🎈",
            ObjectKind::Star => "⭐",
            ObjectKind::Apple => "🍎",
            ObjectKind::PuzzlePiece => "🧩",
            ObjectKind::Ladybug => "🐞",
            ObjectKind::Dot => "🟢",
            ObjectKind::Flower => "🌸",
            ObjectKind::House => "🏠",
        }
    }

    /// Stable identifier used in config files and on the command line.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            ObjectKind::Balloon => "balloon",
            ObjectKind::Star => "star",
            ObjectKind::Apple => "apple",
            ObjectKind::PuzzlePiece => "puzzle_piece",
            ObjectKind::Ladybug => "ladybug",
            ObjectKind::Dot => "dot",
            ObjectKind::Flower => "flower",
            ObjectKind::House => "house",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun().singular)
    }
}

impl FromStr for ObjectKind {
    type Err = ParseObjectKindError;

    /// Accepts the stable key (`"puzzle_piece"`) or the glyph (`"🧩"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ObjectKind::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(needle) || kind.glyph() == needle)
            .ok_or_else(|| ParseObjectKindError {
                raw: s.to_string(),
            })
    }
}
