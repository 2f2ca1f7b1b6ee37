//! Noun phrases for counted objects.
//!
//! Both entry points are pure and total over every `Count` and `ObjectKind`.

use crate::model::{Count, Gender, ObjectKind};

/// Indefinite article for a noun of the given gender.
///
/// Only feminine nouns take a distinct form; masculine and neuter share one.
#[must_use]
pub fn article(gender: Gender) -> &'static str {
    match gender {
        Gender::Feminine => "eine",
        Gender::Masculine | Gender::Neuter => "ein",
    }
}

/// Phrase spoken after counting: `"ein Apfel"`, `"eine Blume"`, `"5 Häuser"`, `"0 Ballons"`.
#[must_use]
pub fn phrase(count: Count, kind: ObjectKind) -> String {
    let noun = kind.noun();
    if count == Count::ONE {
        format!("{} {}", article(noun.gender), noun.singular)
    } else {
        format!("{} {}", count, noun.plural)
    }
}

/// Like [`phrase`] but always states the numeral: `"1 Apfel"`, `"4 Sterne"`.
#[must_use]
pub fn counted_noun(count: Count, kind: ObjectKind) -> String {
    let noun = kind.noun();
    let word = if count == Count::ONE {
        noun.singular
    } else {
        noun.plural
    };
    format!("{count} {word}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(value: u8) -> Count {
        Count::new(value).unwrap()
    }

    #[test]
    fn known_phrases() {
        let cases = [
            (1, ObjectKind::Apple, "ein Apfel"),
            (1, ObjectKind::Flower, "eine Blume"),
            (1, ObjectKind::PuzzlePiece, "ein Puzzleteil"),
            (0, ObjectKind::Balloon, "0 Ballons"),
            (5, ObjectKind::House, "5 Häuser"),
            (2, ObjectKind::Star, "2 Sterne"),
            (1, ObjectKind::Balloon, "ein Ballon"),
            (3, ObjectKind::Ladybug, "3 Marienkäfer"),
            (0, ObjectKind::Apple, "0 Äpfel"),
            (9, ObjectKind::Dot, "9 Punkte"),
            (0, ObjectKind::Flower, "0 Blumen"),
            (7, ObjectKind::PuzzlePiece, "7 Puzzleteile"),
            (1, ObjectKind::Star, "ein Stern"),
            (4, ObjectKind::Balloon, "4 Ballons"),
        ];

        for (n, kind, expected) in cases {
            assert_eq!(phrase(count(n), kind), expected, "phrase({n}, {kind:?})");
        }
    }

    #[test]
    fn article_form_only_for_one() {
        for kind in ObjectKind::ALL {
            let noun = kind.noun();
            for n in Count::all() {
                let text = phrase(n, kind);
                assert_eq!(text, phrase(n, kind));
                if n == Count::ONE {
                    assert_eq!(text, format!("{} {}", article(noun.gender), noun.singular));
                } else {
                    assert_eq!(text, format!("{} {}", n.value(), noun.plural));
                }
            }
        }
    }

    #[test]
    fn counted_noun_keeps_numeral_for_one() {
        assert_eq!(counted_noun(count(1), ObjectKind::Apple), "1 Apfel");
        assert_eq!(counted_noun(count(1), ObjectKind::Flower), "1 Blume");
        assert_eq!(counted_noun(count(4), ObjectKind::Star), "4 Sterne");
        assert_eq!(counted_noun(count(0), ObjectKind::House), "0 Häuser");
    }
}
