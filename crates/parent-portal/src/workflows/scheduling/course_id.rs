use std::sync::OnceLock;

use regex::Regex;

/// Decomposed composite course identifier.
///
/// The catalog carries two structural variants of the same encoding,
/// `SPEC_C001_round001` and `SPEC_C001round001`; both are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseIdParts {
    pub category: String,
    pub course_number: String,
    pub round: String,
}

/// Malformed composite course identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("course id '{0}' is not of the form CATEGORY_Cnnn[_]roundnnn")]
pub struct CourseIdError(pub String);

fn separated_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Z]+)_(C\d+)_(round\d+)$").expect("valid course id pattern")
    })
}

fn fused_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Z]+)_(C\d+)(round\d+)$").expect("valid course id pattern")
    })
}

impl CourseIdParts {
    /// Parse a composite course id, trying the underscore-separated variant
    /// first and the fused variant second.
    pub fn decompose(raw: &str) -> Result<Self, CourseIdError> {
        let captures = separated_pattern()
            .captures(raw)
            .or_else(|| fused_pattern().captures(raw))
            .ok_or_else(|| CourseIdError(raw.to_string()))?;

        Ok(Self {
            category: captures[1].to_string(),
            course_number: captures[2].to_string(),
            round: captures[3].to_string(),
        })
    }

    /// Two offerings are siblings, and therefore cross-substitutable, iff
    /// category and round match while the course number differs.
    pub fn is_sibling_of(&self, other: &CourseIdParts) -> bool {
        self.category == other.category
            && self.round == other.round
            && self.course_number != other.course_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separated_variant_decomposes() {
        let parts = CourseIdParts::decompose("SPEC_C001_round001").expect("parses");
        assert_eq!(parts.category, "SPEC");
        assert_eq!(parts.course_number, "C001");
        assert_eq!(parts.round, "round001");
    }

    #[test]
    fn fused_variant_decomposes_identically() {
        let separated = CourseIdParts::decompose("SPEC_C001_round001").expect("parses");
        let fused = CourseIdParts::decompose("SPEC_C001round001").expect("parses");
        assert_eq!(separated, fused);
    }

    #[test]
    fn rejects_lowercase_category_and_missing_round() {
        for raw in ["spec_C001_round001", "SPEC_C001", "SPEC-C001-round001", ""] {
            assert_eq!(
                CourseIdParts::decompose(raw),
                Err(CourseIdError(raw.to_string()))
            );
        }
    }

    #[test]
    fn siblings_share_category_and_round_only() {
        let target = CourseIdParts::decompose("SPEC_C001_round001").expect("parses");
        let sibling = CourseIdParts::decompose("SPEC_C002_round001").expect("parses");
        let wrong_round = CourseIdParts::decompose("SPEC_C002_round002").expect("parses");
        let other_category = CourseIdParts::decompose("DRAMA_C002_round001").expect("parses");

        assert!(sibling.is_sibling_of(&target));
        assert!(!target.is_sibling_of(&target));
        assert!(!wrong_round.is_sibling_of(&target));
        assert!(!other_category.is_sibling_of(&target));
    }
}
