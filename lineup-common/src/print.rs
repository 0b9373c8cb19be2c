//! Printable lineup sheet

use std::collections::HashMap;
use std::fmt::Write;

use crate::db::{Category, Lineup, Show};

/// Render saved lineups as the plain-text sheet handed to the show table
///
/// Each breed sits on its own line followed by a comma, except the last which
/// ends with a period. Unknown category or show ids print as `Unknown`.
pub fn format_lineups(lineups: &[Lineup], categories: &[Category], shows: &[Show]) -> String {
    if lineups.is_empty() {
        return "No lineups saved.".to_string();
    }

    let category_names: HashMap<i64, &str> =
        categories.iter().map(|c| (c.id, c.name.as_str())).collect();
    let show_labels: HashMap<i64, &str> = shows.iter().map(|s| (s.id, s.label.as_str())).collect();

    let mut out = String::new();
    for (index, lineup) in lineups.iter().enumerate() {
        let category = category_names.get(&lineup.category_id).copied().unwrap_or("Unknown");
        let show = show_labels.get(&lineup.show_id).copied().unwrap_or("Unknown");

        // Writing to a String cannot fail
        let _ = writeln!(out, "Lineup: {}", index + 1);
        let _ = writeln!(out, "Category: {}", category);
        let _ = writeln!(out, "Show: {}", show);
        out.push_str("Breed:\n");

        if lineup.breeds.is_empty() {
            out.push_str("Unknown.\n");
        } else {
            let last = lineup.breeds.len() - 1;
            for (i, breed) in lineup.breeds.iter().enumerate() {
                let terminator = if i < last { ',' } else { '.' };
                let _ = writeln!(out, "{}{}", breed, terminator);
            }
        }
        out.push('\n');
    }

    out
}
