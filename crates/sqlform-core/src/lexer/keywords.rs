//! The keyword table.
//!
//! Keywords live in one static table sorted by their lowercase spelling, so a
//! scanned word is resolved with a case-insensitive binary search. Multi-word
//! keywords (`group by`, `is not null`, ...) sit in the same table; the lexer
//! never scans them directly, it synthesizes them by folding two or three
//! single-word keywords (see [`TokenStream`](super::TokenStream)).

use core::cmp::Ordering;
use std::sync::Once;

use serde::Serialize;

/// Identifier of the first keyword. Keyword discriminants are
/// `KEYWORD_BASE + index in the table`.
pub const KEYWORD_BASE: u16 = 256;

/// SQL keywords, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum Keyword {
    And = KEYWORD_BASE,
    As,
    Asc,
    Between,
    By,
    Cross,
    Desc,
    Exists,
    False,
    First,
    From,
    Full,
    Group,
    GroupBy,
    Having,
    Ilike,
    In,
    Inner,
    Is,
    IsNotNull,
    IsNull,
    Join,
    Last,
    Left,
    Like,
    Limit,
    Natural,
    Not,
    NotIn,
    Null,
    Nulls,
    Offset,
    On,
    Or,
    Order,
    OrderBy,
    Outer,
    Right,
    Select,
    True,
    Unknown,
    Using,
    Where,
}

/// One row of the keyword table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordEntry {
    /// The keyword identifier.
    pub keyword: Keyword,
    /// Canonical lowercase spelling.
    pub spelling: &'static str,
    /// Reserved keywords cannot be used as bare identifiers or labels.
    pub reserved: bool,
}

const fn kw(keyword: Keyword, spelling: &'static str, reserved: bool) -> KeywordEntry {
    KeywordEntry {
        keyword,
        spelling,
        reserved,
    }
}

/// Keyword table. Must stay sorted by spelling.
pub static KEYWORDS: &[KeywordEntry] = &[
    kw(Keyword::And, "and", true),
    kw(Keyword::As, "as", false),
    kw(Keyword::Asc, "asc", false),
    kw(Keyword::Between, "between", true),
    kw(Keyword::By, "by", false),
    kw(Keyword::Cross, "cross", false),
    kw(Keyword::Desc, "desc", false),
    kw(Keyword::Exists, "exists", false),
    kw(Keyword::False, "false", true),
    kw(Keyword::First, "first", false),
    kw(Keyword::From, "from", true),
    kw(Keyword::Full, "full", false),
    kw(Keyword::Group, "group", false),
    kw(Keyword::GroupBy, "group by", true),
    kw(Keyword::Having, "having", true),
    kw(Keyword::Ilike, "ilike", true),
    kw(Keyword::In, "in", true),
    kw(Keyword::Inner, "inner", false),
    kw(Keyword::Is, "is", true),
    kw(Keyword::IsNotNull, "is not null", true),
    kw(Keyword::IsNull, "is null", true),
    kw(Keyword::Join, "join", true),
    kw(Keyword::Last, "last", false),
    kw(Keyword::Left, "left", false),
    kw(Keyword::Like, "like", true),
    kw(Keyword::Limit, "limit", true),
    kw(Keyword::Natural, "natural", false),
    kw(Keyword::Not, "not", true),
    kw(Keyword::NotIn, "not in", true),
    kw(Keyword::Null, "null", true),
    kw(Keyword::Nulls, "nulls", false),
    kw(Keyword::Offset, "offset", true),
    kw(Keyword::On, "on", true),
    kw(Keyword::Or, "or", true),
    kw(Keyword::Order, "order", false),
    kw(Keyword::OrderBy, "order by", true),
    kw(Keyword::Outer, "outer", false),
    kw(Keyword::Right, "right", false),
    kw(Keyword::Select, "select", true),
    kw(Keyword::True, "true", true),
    kw(Keyword::Unknown, "unknown", false),
    kw(Keyword::Using, "using", true),
    kw(Keyword::Where, "where", true),
];

impl Keyword {
    /// Returns the table row of this keyword.
    #[must_use]
    pub fn entry(self) -> &'static KeywordEntry {
        &KEYWORDS[usize::from(self as u16 - KEYWORD_BASE)]
    }

    /// Canonical lowercase spelling.
    #[must_use]
    pub fn spelling(self) -> &'static str {
        self.entry().spelling
    }

    /// Whether the keyword is reserved.
    #[must_use]
    pub fn is_reserved(self) -> bool {
        self.entry().reserved
    }

    /// Uppercase spelling, used when rendering SQL.
    #[must_use]
    pub fn as_sql(self) -> String {
        self.spelling().to_ascii_uppercase()
    }

    /// Keywords that may start a join clause.
    #[must_use]
    pub const fn starts_join(self) -> bool {
        matches!(
            self,
            Self::Join | Self::Inner | Self::Cross | Self::Left | Self::Right | Self::Full
        )
    }
}

/// Compares a scanned word with a lowercase table spelling, ignoring ASCII
/// case of the word.
fn compare_ignore_case(word: &str, spelling: &str) -> Ordering {
    word.bytes()
        .map(|b| b.to_ascii_lowercase())
        .cmp(spelling.bytes())
}

/// Looks a word up in the keyword table, case-insensitively.
#[must_use]
pub fn lookup(word: &str) -> Option<&'static KeywordEntry> {
    KEYWORDS
        .binary_search_by(|entry| compare_ignore_case(word, entry.spelling).reverse())
        .ok()
        .map(|index| &KEYWORDS[index])
}

/// Verifies that the table is sorted and that every keyword sits at the index
/// matching its discriminant.
///
/// # Panics
///
/// Panics when the table is malformed. This is a build defect, never a
/// consequence of user input.
pub fn check_keyword_table() {
    for (index, entry) in KEYWORDS.iter().enumerate() {
        let expected = usize::from(KEYWORD_BASE) + index;
        let actual = usize::from(entry.keyword as u16);
        assert!(
            actual == expected,
            "unexpected keyword value ({actual} expected {expected}) for keyword \"{}\"",
            entry.spelling
        );
        if index > 0 {
            let previous = KEYWORDS[index - 1].spelling;
            assert!(
                compare_ignore_case(entry.spelling, previous) == Ordering::Greater,
                "unsorted keyword table ({} {previous})",
                entry.spelling
            );
        }
    }
}

static TABLE_CHECK: Once = Once::new();

/// Runs [`check_keyword_table`] once per process.
pub(crate) fn ensure_keyword_table() {
    TABLE_CHECK.call_once(check_keyword_table);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_table_is_sorted() {
        check_keyword_table();
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup("SELECT").map(|e| e.keyword), Some(Keyword::Select));
        assert_eq!(lookup("select").map(|e| e.keyword), Some(Keyword::Select));
        assert_eq!(lookup("SeLeCt").map(|e| e.keyword), Some(Keyword::Select));
        assert_eq!(lookup("not_a_keyword"), None);
        assert_eq!(lookup(""), None);
    }

    #[test]
    fn test_lookup_first_and_last_entries() {
        assert_eq!(lookup("AND").map(|e| e.keyword), Some(Keyword::And));
        assert_eq!(lookup("where").map(|e| e.keyword), Some(Keyword::Where));
    }

    #[test]
    fn test_prefix_is_not_a_match() {
        assert_eq!(lookup("sel"), None);
        assert_eq!(lookup("selects"), None);
        assert_eq!(lookup("nul").map(|e| e.keyword), None);
        assert_eq!(lookup("nulls").map(|e| e.keyword), Some(Keyword::Nulls));
    }

    #[test]
    fn test_entry_matches_discriminant() {
        assert_eq!(Keyword::GroupBy.spelling(), "group by");
        assert!(Keyword::GroupBy.is_reserved());
        assert!(!Keyword::Group.is_reserved());
        assert_eq!(Keyword::IsNotNull.as_sql(), "IS NOT NULL");
    }

    #[test]
    fn test_reserved_flags() {
        for word in ["select", "from", "where", "and", "or", "null", "true"] {
            assert!(lookup(word).is_some_and(|e| e.reserved), "{word}");
        }
        for word in ["as", "asc", "desc", "left", "group", "order", "unknown"] {
            assert!(lookup(word).is_some_and(|e| !e.reserved), "{word}");
        }
    }
}
