//! Reference answers for the search checks.
//!
//! The two lab variants load different slices of the same music dataset,
//! so the set of artists a correct `search "The Beatles"` must return
//! differs per grading mode.

use crate::GradingMode;

/// Artists a correct Mongo submission returns for `search "The Beatles" 9`.
pub const MONGO_SEARCH_ANSWERS: &[&str] = &[
    "Adam Melchor",
    "David Bowie",
    "Dezo Ursiny",
    "Fairway",
    "Forever The Sickest Kids",
    "Johnny Cash",
    "King Crimson",
    "The Auteurs",
    "Timber Timbre",
];

/// Artists a correct MySQL submission returns for `search "The Beatles" 39`.
pub const RELATIONAL_SEARCH_ANSWERS: &[&str] = &[
    "PeterTG",
    "Various Artists",
    "The Tarney - Spencer Band",
    "Alchem",
    "Bidiniband",
    "D-A-D",
    "Furthur",
    "Ventures The",
    "The Takeover Uk",
    "Vertical Horizon",
    "Ianva",
    "Eddie Vedder",
    "Black Lips",
    "Various",
    "Placebo",
    "Ingrid Michaelson",
    "Morse Code",
    "Gov T Mule",
    "El Tri",
    "Mangoo",
    "I Am Kloot",
    "The Hard Lesson",
    "Dan Baird & Homemade Sin",
    "Wolfmother",
    "PLASTICZOOMS",
    "Hybrid Ice",
    "Bob Sinclar",
    "Juraya",
    "U2",
    "Burn Hollywood Burn",
    "Ray Davies The Crouch End Festival Chorus",
    "The Backyards",
    "Chickenfoot",
    "Gluecifer",
    "Kevin Devine",
    "The Band",
    "Survivor",
    "Roger Taylor",
    "Black Eyed Peas",
];

/// Get the search reference set for a grading mode
pub fn search_answers(mode: GradingMode) -> &'static [&'static str] {
    match mode {
        GradingMode::Mongo => MONGO_SEARCH_ANSWERS,
        GradingMode::Relational => RELATIONAL_SEARCH_ANSWERS,
    }
}

/// Result-count limit that makes the full reference set come back
pub fn full_search_limit(mode: GradingMode) -> usize {
    search_answers(mode).len()
}
