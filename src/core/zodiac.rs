use crate::models::ScoringBands;
use chrono::{Datelike, NaiveDate};

/// The four classical elements the signs map onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Fire,
    Air,
    Water,
    Earth,
}

/// Western sun sign for a birth date
pub fn sun_sign(birth_date: NaiveDate) -> &'static str {
    match (birth_date.month(), birth_date.day()) {
        (3, 21..=31) | (4, 1..=19) => "Aries",
        (4, 20..=30) | (5, 1..=20) => "Taurus",
        (5, 21..=31) | (6, 1..=20) => "Gemini",
        (6, 21..=30) | (7, 1..=22) => "Cancer",
        (7, 23..=31) | (8, 1..=22) => "Leo",
        (8, 23..=31) | (9, 1..=22) => "Virgo",
        (9, 23..=30) | (10, 1..=22) => "Libra",
        (10, 23..=31) | (11, 1..=21) => "Scorpio",
        (11, 22..=30) | (12, 1..=21) => "Sagittarius",
        (12, 22..=31) | (1, 1..=19) => "Capricorn",
        (1, 20..=31) | (2, 1..=18) => "Aquarius",
        _ => "Pisces",
    }
}

/// Element a sign belongs to; None for unrecognized sign names
pub fn element_of(sign: &str) -> Option<Element> {
    match sign {
        "Aries" | "Leo" | "Sagittarius" => Some(Element::Fire),
        "Gemini" | "Libra" | "Aquarius" => Some(Element::Air),
        "Cancer" | "Scorpio" | "Pisces" => Some(Element::Water),
        "Taurus" | "Virgo" | "Capricorn" => Some(Element::Earth),
        _ => None,
    }
}

/// Deterministic element bonus for a pair, applied before tier thresholding
///
/// Same element earns the full bonus, the Fire/Air and Water/Earth harmony
/// pairs earn the smaller one, everything else earns none. Unknown elements
/// never earn a bonus.
pub fn element_bonus(a: NaiveDate, b: NaiveDate, bands: &ScoringBands) -> u8 {
    let ea = element_of(sun_sign(a));
    let eb = element_of(sun_sign(b));

    match (ea, eb) {
        (Some(x), Some(y)) if x == y => bands.same_element_bonus,
        (Some(x), Some(y)) if is_harmony(x, y) => bands.harmony_bonus,
        _ => 0,
    }
}

#[inline]
fn is_harmony(x: Element, y: Element) -> bool {
    matches!(
        (x, y),
        (Element::Fire, Element::Air)
            | (Element::Air, Element::Fire)
            | (Element::Water, Element::Earth)
            | (Element::Earth, Element::Water)
    )
}
