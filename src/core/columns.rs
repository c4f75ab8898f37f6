//! Canonical column order for answer tables.
//!
//! Answer sheets name their fields `<Section>_<n>` (`Math_2`, `Science_10`).
//! Columns are grouped by section and ordered by question number, with
//! anything that does not follow the convention placed after them.

use crate::domain::model::FILENAME_COLUMN;
use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

// 只錨定開頭，`Math_2_extra` 仍視為 (Math, 2)
static SECTION_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z\s]+)_([0-9]+)").expect("valid column pattern"));

#[derive(Debug, Clone, Copy)]
pub enum ColumnKey<'a> {
    Filename,
    Section { section: &'a str, number: &'a str },
    /// Sorts as if its number were infinite.
    Unmatched(&'a str),
}

impl<'a> ColumnKey<'a> {
    pub fn of(name: &'a str) -> Self {
        if name == FILENAME_COLUMN {
            return ColumnKey::Filename;
        }
        match SECTION_NUMBER.captures(name) {
            Some(caps) => match (caps.get(1), caps.get(2)) {
                (Some(section), Some(number)) => ColumnKey::Section {
                    section: section.as_str(),
                    number: number.as_str(),
                },
                _ => ColumnKey::Unmatched(name),
            },
            None => ColumnKey::Unmatched(name),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            ColumnKey::Filename => 0,
            ColumnKey::Section { .. } => 1,
            ColumnKey::Unmatched(_) => 2,
        }
    }
}

impl Ord for ColumnKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (
                ColumnKey::Section { section, number },
                ColumnKey::Section {
                    section: other_section,
                    number: other_number,
                },
            ) => section
                .cmp(other_section)
                .then_with(|| compare_digits(number, other_number)),
            (ColumnKey::Unmatched(name), ColumnKey::Unmatched(other_name)) => name.cmp(other_name),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

// `Math_2` and `Math_02` are the same key
impl PartialEq for ColumnKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ColumnKey<'_> {}

impl PartialOrd for ColumnKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Numeric comparison of ASCII digit strings of any length.
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Stable sort: columns with identical keys keep their incoming order.
pub fn order_columns(columns: &mut [String]) {
    columns.sort_by(|a, b| ColumnKey::of(a).cmp(&ColumnKey::of(b)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordered(names: &[&str]) -> Vec<String> {
        let mut columns: Vec<String> = names.iter().map(|name| name.to_string()).collect();
        order_columns(&mut columns);
        columns
    }

    #[test]
    fn test_numeric_aware_order() {
        assert_eq!(
            ordered(&["Notes", "Science_1", "Math_10", "filename", "Math_2"]),
            vec!["filename", "Math_2", "Math_10", "Science_1", "Notes"]
        );
    }

    #[test]
    fn test_filename_always_first() {
        assert_eq!(
            ordered(&["Algebra_1", "filename", "Aardvark"]),
            vec!["filename", "Algebra_1", "Aardvark"]
        );
    }

    #[test]
    fn test_sections_may_contain_whitespace() {
        assert_eq!(
            ordered(&["Part B_1", "Part A_3", "Part A_12"]),
            vec!["Part A_3", "Part A_12", "Part B_1"]
        );
    }

    #[test]
    fn test_pattern_is_anchored_at_start_only() {
        assert_eq!(
            ColumnKey::of("Math_2_bonus"),
            ColumnKey::Section {
                section: "Math",
                number: "2"
            }
        );
        assert_eq!(ColumnKey::of("Q1_2"), ColumnKey::Unmatched("Q1_2"));
        assert_eq!(ColumnKey::of("_3"), ColumnKey::Unmatched("_3"));
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        assert_eq!(
            ordered(&["Math_2_b", "Math_02", "Math_2_a", "Math_1"]),
            vec!["Math_1", "Math_2_b", "Math_02", "Math_2_a"]
        );
    }

    #[test]
    fn test_numbers_longer_than_u64() {
        assert_eq!(
            ordered(&["Q_100000000000000000000000", "Q_99999999999999999999999"]),
            vec!["Q_99999999999999999999999", "Q_100000000000000000000000"]
        );
    }

    #[test]
    fn test_unmatched_names_sort_alphabetically() {
        assert_eq!(
            ordered(&["Zeta", "Comments", "Science_1", "alpha"]),
            vec!["Science_1", "Comments", "Zeta", "alpha"]
        );
    }
}
