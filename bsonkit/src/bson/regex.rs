use std::fmt::{Display, Formatter};

use crate::common::REGEX_OPTIONS;
use crate::errors::{BsonError, BsonResult, ErrorKind};
use itertools::Itertools;

/// A regular expression value: a pattern and a set of option letters.
///
/// Options are kept sorted and deduplicated, which is the order the binary
/// format requires.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Regex {
    pattern: String,
    options: String,
}

impl Regex {
    pub fn new(pattern: &str, options: &str) -> Self {
        let options = options.chars().sorted().dedup().collect();
        Regex {
            pattern: pattern.to_string(),
            options,
        }
    }

    /// Parses the `/pattern/options` literal form.
    pub fn parse_literal(literal: &str) -> BsonResult<Self> {
        let malformed = || {
            log::error!("Invalid regular expression literal {}", literal);
            BsonError::new(
                &format!("Invalid regular expression literal {}", literal),
                ErrorKind::Argument,
            )
        };

        let body = literal.strip_prefix('/').ok_or_else(malformed)?;
        let end = body.rfind('/').ok_or_else(malformed)?;
        Ok(Regex::new(&body[..end], &body[end + 1..]))
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn options(&self) -> &str {
        &self.options
    }

    /// Compiles the pattern with the `regex` crate.
    ///
    /// Options `i`, `m`, `s` and `x` become inline flags; `l` and `u` have
    /// no effect because the `regex` crate is always Unicode aware.
    pub fn to_regex(&self) -> BsonResult<regex::Regex> {
        let flags: String = self
            .options
            .chars()
            .filter(|c| matches!(c, 'i' | 'm' | 's' | 'x'))
            .collect();

        for option in self.options.chars() {
            if !REGEX_OPTIONS.contains(&option) {
                log::error!("Unsupported regular expression option '{}'", option);
                return Err(BsonError::new(
                    &format!("Unsupported regular expression option '{}'", option),
                    ErrorKind::Argument,
                ));
            }
        }

        let source = if flags.is_empty() {
            self.pattern.clone()
        } else {
            format!("(?{}){}", flags, self.pattern)
        };

        regex::Regex::new(&source).map_err(|e| {
            log::error!("Invalid regular expression {}: {}", self.pattern, e);
            BsonError::new(
                &format!("Invalid regular expression {}: {}", self.pattern, e),
                ErrorKind::Argument,
            )
        })
    }
}

impl Display for Regex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}/{}", self.pattern, self.options)
    }
}

impl From<&regex::Regex> for Regex {
    fn from(value: &regex::Regex) -> Self {
        Regex::new(value.as_str(), "")
    }
}
