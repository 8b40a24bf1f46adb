//! Table rendering for CLI output using comfy-table.
//!
//! Provides consistent table formatting for commands that display tabular
//! data.
//!
//! ## Tables Overview
//!
//! | Command | Table Function |
//! |---------|----------------|
//! | `wv words`, `wv top`, `wv search` | `render_words_table()` |
//! | `wv lengths` | `render_lengths_table()` |
//! | `wv stats` | `render_stats_table()` |

use std::collections::BTreeMap;

use comfy_table::presets::NOTHING;
use comfy_table::{Cell, CellAlignment, ColumnConstraint, Table, Width};

use wv_core::{WordRecord, WordStats};

use super::format::{format_thousands, truncate_str};

/// Render a word list table for `wv words`, `wv top`, and `wv search`.
///
/// # Example Output
///
/// ```text
/// WORD       LEN   POINTS   DICTIONARIES
/// jazzy        5       34   otcwl,sowpods,wwf
/// fuzzy        5       29   otcwl,sowpods
/// ```
pub fn render_words_table(records: &[WordRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);

    table.set_header(vec![
        Cell::new("WORD"),
        Cell::new("LEN").set_alignment(CellAlignment::Right),
        Cell::new("POINTS").set_alignment(CellAlignment::Right),
        Cell::new("DICTIONARIES"),
    ]);

    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(10)), // WORD
        ColumnConstraint::LowerBoundary(Width::Fixed(5)),  // LEN
        ColumnConstraint::LowerBoundary(Width::Fixed(8)),  // POINTS
        ColumnConstraint::LowerBoundary(Width::Fixed(14)), // DICTIONARIES
    ]);

    for record in records {
        table.add_row(vec![
            Cell::new(&record.word),
            Cell::new(record.length).set_alignment(CellAlignment::Right),
            Cell::new(record.points).set_alignment(CellAlignment::Right),
            Cell::new(truncate_str(&record.flags.to_string(), 40)),
        ]);
    }

    table.trim_fmt().to_string()
}

/// Render the length distribution table for `wv lengths`.
///
/// # Example Output
///
/// ```text
/// LENGTH    WORDS
///      2      127
///      3    1,338
/// ```
pub fn render_lengths_table(distribution: &BTreeMap<u32, u64>) -> String {
    if distribution.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);

    table.set_header(vec![
        Cell::new("LENGTH").set_alignment(CellAlignment::Right),
        Cell::new("WORDS").set_alignment(CellAlignment::Right),
    ]);

    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(7)), // LENGTH
        ColumnConstraint::LowerBoundary(Width::Fixed(9)), // WORDS
    ]);

    for (length, count) in distribution {
        table.add_row(vec![
            Cell::new(length).set_alignment(CellAlignment::Right),
            Cell::new(format_thousands(*count)).set_alignment(CellAlignment::Right),
        ]);
    }

    table.trim_fmt().to_string()
}

/// Render a key-value statistics table for `wv stats`.
///
/// # Example Output
///
/// ```text
/// METRIC              VALUE
/// Total words         4,582
/// Average points      14.32
/// ```
pub fn render_stats_table(stats: &WordStats) -> String {
    let mut table = Table::new();
    table.load_preset(NOTHING);

    table.set_header(vec![
        Cell::new("METRIC"),
        Cell::new("VALUE").set_alignment(CellAlignment::Right),
    ]);

    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(18)), // METRIC
        ColumnConstraint::LowerBoundary(Width::Fixed(12)), // VALUE
    ]);

    let rows: Vec<(&str, String)> = vec![
        ("Total words", format_thousands(stats.total_words)),
        ("Average points", format!("{:.2}", stats.average_points)),
        ("Min points", stats.min_points.to_string()),
        ("Max points", stats.max_points.to_string()),
        ("Total points", format_thousands(stats.total_points.max(0) as u64)),
        (
            "Highest word",
            stats.highest_word.clone().unwrap_or_else(|| "-".to_string()),
        ),
    ];

    for (key, value) in rows {
        table.add_row(vec![
            Cell::new(key),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }

    table.trim_fmt().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use wv_core::DictFlags;

    fn sample_records() -> Vec<WordRecord> {
        let now = Utc::now();
        vec![
            WordRecord {
                word: "jazzy".to_string(),
                length: 5,
                points: 34,
                flags: DictFlags::from_bits(0b10_1010),
                created_at: now,
                updated_at: now,
            },
            WordRecord {
                word: "fuzzy".to_string(),
                length: 5,
                points: 29,
                flags: DictFlags::empty(),
                created_at: now,
                updated_at: now,
            },
        ]
    }

    #[test]
    fn test_words_table_structure() {
        let output = render_words_table(&sample_records());
        assert!(output.contains("WORD"));
        assert!(output.contains("POINTS"));
        assert!(output.contains("DICTIONARIES"));
        assert!(output.contains("jazzy"));
        assert!(output.contains("34"));
        assert!(output.contains("otcwl"));
        // Empty flag sets render as a dash.
        assert!(output.contains('-'));
    }

    #[test]
    fn test_lengths_table() {
        let mut distribution = BTreeMap::new();
        distribution.insert(2, 127u64);
        distribution.insert(3, 1338u64);

        let output = render_lengths_table(&distribution);
        assert!(output.contains("LENGTH"));
        assert!(output.contains("WORDS"));
        assert!(output.contains("127"));
        assert!(output.contains("1,338")); // Thousands separator
    }

    #[test]
    fn test_stats_table() {
        let stats = WordStats {
            total_words: 4582,
            average_points: 14.317,
            min_points: 2,
            max_points: 39,
            total_points: 65601,
            highest_word: Some("quizzify".to_string()),
        };

        let output = render_stats_table(&stats);
        assert!(output.contains("4,582"));
        assert!(output.contains("14.32"));
        assert!(output.contains("quizzify"));
    }

    #[test]
    fn test_empty_tables() {
        assert_eq!(render_words_table(&[]), "");
        assert_eq!(render_lengths_table(&BTreeMap::new()), "");
    }
}
