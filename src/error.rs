use std::fmt;

/// Route registration error
///
/// Returned by `RouteTable::register` (and every builder method that funnels
/// into it) when a pattern cannot be placed in the trie. These are startup
/// errors: a builder that produced one should not be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// A segment follows a `*name` wildcard
    ///
    /// Wildcards capture the rest of the path, so they must be the final
    /// segment of a pattern (e.g. `/assets/*filepath`).
    SegmentAfterWildcard {
        /// The offending pattern
        pattern: String,
        /// Name of the wildcard that was not last
        wildcard: String,
    },
    /// A `:` or `*` segment without a name
    EmptyName {
        /// The offending pattern
        pattern: String,
    },
    /// Two patterns use different parameter names at the same trie position
    ///
    /// A node holds at most one parameter child, so `/users/:id` and
    /// `/users/:user_id/posts` cannot coexist.
    ParamConflict {
        /// The offending pattern
        pattern: String,
        /// Name already registered at this position
        existing: String,
        /// Name requested by the new pattern
        requested: String,
    },
    /// Two patterns use different wildcard names at the same trie position
    WildcardConflict {
        /// The offending pattern
        pattern: String,
        /// Name already registered at this position
        existing: String,
        /// Name requested by the new pattern
        requested: String,
    },
    /// The HTTP method string is empty
    EmptyMethod {
        /// The pattern that was being registered
        pattern: String,
    },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::SegmentAfterWildcard { pattern, wildcard } => write!(
                f,
                "route error: wildcard '*{wildcard}' must be the last segment of '{pattern}'"
            ),
            RouteError::EmptyName { pattern } => write!(
                f,
                "route error: parameter or wildcard without a name in '{pattern}'"
            ),
            RouteError::ParamConflict {
                pattern,
                existing,
                requested,
            } => write!(
                f,
                "route error: parameter ':{requested}' in '{pattern}' conflicts with \
                 existing parameter ':{existing}' at the same position"
            ),
            RouteError::WildcardConflict {
                pattern,
                existing,
                requested,
            } => write!(
                f,
                "route error: wildcard '*{requested}' in '{pattern}' conflicts with \
                 existing wildcard '*{existing}' at the same position"
            ),
            RouteError::EmptyMethod { pattern } => {
                write!(f, "route error: empty HTTP method for '{pattern}'")
            }
        }
    }
}

impl std::error::Error for RouteError {}
