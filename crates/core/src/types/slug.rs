//! URL slug type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum SlugError {
    /// The input string is empty (or normalizes to empty).
    #[error("slug cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9-]` after lowercasing.
    #[error("slug contains invalid character '{0}'")]
    InvalidCharacter(char),
    /// The input starts or ends with a hyphen.
    #[error("slug cannot start or end with a hyphen")]
    EdgeHyphen,
}

/// A URL path segment identifying an entity.
///
/// Slugs are always lowercase and restricted to `[a-z0-9-]`. Parsing
/// lowercases the input; use [`Slug::generate`] to derive a slug from
/// free-form text such as a store or product name.
///
/// ## Examples
///
/// ```
/// use tangelo_core::Slug;
///
/// let slug = Slug::parse("Acme-Outdoors").unwrap();
/// assert_eq!(slug.as_str(), "acme-outdoors");
///
/// let generated = Slug::generate("Acme Outdoors & Co.").unwrap();
/// assert_eq!(generated.as_str(), "acme-outdoors-co");
///
/// assert!(Slug::parse("").is_err());
/// assert!(Slug::parse("has spaces").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Maximum length of a slug.
    pub const MAX_LENGTH: usize = 120;

    /// Parse a `Slug` from a string, lowercasing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, contains a
    /// character outside `[a-z0-9-]` after lowercasing, or has a leading
    /// or trailing hyphen.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        let lowered = s.trim().to_lowercase();
        if lowered.is_empty() {
            return Err(SlugError::Empty);
        }
        if lowered.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        for c in lowered.chars() {
            if !matches!(c, 'a'..='z' | '0'..='9' | '-') {
                return Err(SlugError::InvalidCharacter(c));
            }
        }
        if lowered.starts_with('-') || lowered.ends_with('-') {
            return Err(SlugError::EdgeHyphen);
        }
        Ok(Self(lowered))
    }

    /// Derive a slug from free-form text.
    ///
    /// Lowercases, maps whitespace and separator runs to single hyphens,
    /// and drops every other character.
    ///
    /// # Errors
    ///
    /// Returns [`SlugError::Empty`] if nothing slug-worthy remains.
    pub fn generate(text: &str) -> Result<Self, SlugError> {
        let mut out = String::with_capacity(text.len());
        let mut pending_hyphen = false;
        for c in text.to_lowercase().chars() {
            match c {
                'a'..='z' | '0'..='9' => {
                    if pending_hyphen && !out.is_empty() {
                        out.push('-');
                    }
                    pending_hyphen = false;
                    out.push(c);
                }
                _ => pending_hyphen = true,
            }
        }
        if out.len() > Self::MAX_LENGTH {
            out.truncate(Self::MAX_LENGTH);
            while out.ends_with('-') {
                out.pop();
            }
        }
        if out.is_empty() {
            return Err(SlugError::Empty);
        }
        Ok(Self(out))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Slug` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Slug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Slug {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Slug {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lowercases() {
        assert_eq!(Slug::parse("Acme-Outdoors").unwrap().as_str(), "acme-outdoors");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(Slug::parse(""), Err(SlugError::Empty)));
        assert!(matches!(Slug::parse("  "), Err(SlugError::Empty)));
    }

    #[test]
    fn test_parse_rejects_invalid_characters() {
        assert!(matches!(
            Slug::parse("has spaces"),
            Err(SlugError::InvalidCharacter(' '))
        ));
        assert!(matches!(
            Slug::parse("uné"),
            Err(SlugError::InvalidCharacter('é'))
        ));
    }

    #[test]
    fn test_parse_rejects_edge_hyphens() {
        assert!(matches!(Slug::parse("-acme"), Err(SlugError::EdgeHyphen)));
        assert!(matches!(Slug::parse("acme-"), Err(SlugError::EdgeHyphen)));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(121);
        assert!(matches!(Slug::parse(&long), Err(SlugError::TooLong { .. })));
    }

    #[test]
    fn test_generate_from_name() {
        assert_eq!(
            Slug::generate("Acme Outdoors & Co.").unwrap().as_str(),
            "acme-outdoors-co"
        );
        assert_eq!(Slug::generate("  Wool Socks  ").unwrap().as_str(), "wool-socks");
        assert_eq!(Slug::generate("100% Cotton").unwrap().as_str(), "100-cotton");
    }

    #[test]
    fn test_generate_empty_input() {
        assert!(matches!(Slug::generate("!!!"), Err(SlugError::Empty)));
    }

    #[test]
    fn test_generate_truncates() {
        let slug = Slug::generate(&"word ".repeat(40)).unwrap();
        assert!(slug.as_str().len() <= Slug::MAX_LENGTH);
        assert!(!slug.as_str().ends_with('-'));
    }
}
