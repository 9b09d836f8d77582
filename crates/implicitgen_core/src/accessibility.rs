//! Declared accessibility levels and the "relatively accessible" relation.
//!
//! Levels form a partial order from most to least visible:
//!
//! ```text
//! Public > ProtectedOrInternal > { Internal, Protected } > ProtectedAndInternal > Private
//! ```
//!
//! `Internal` and `Protected` are incomparable: each grants access the other denies.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A declared accessibility level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accessibility {
    Private,
    ProtectedAndInternal,
    Protected,
    Internal,
    ProtectedOrInternal,
    Public,
}

impl Accessibility {
    /// Every level, least visible first.
    pub const ALL: [Accessibility; 6] = [
        Accessibility::Private,
        Accessibility::ProtectedAndInternal,
        Accessibility::Protected,
        Accessibility::Internal,
        Accessibility::ProtectedOrInternal,
        Accessibility::Public,
    ];

    /// Host keyword spelling of the level.
    pub fn as_keyword(self) -> &'static str {
        match self {
            Accessibility::Private => "private",
            Accessibility::ProtectedAndInternal => "private protected",
            Accessibility::Protected => "protected",
            Accessibility::Internal => "internal",
            Accessibility::ProtectedOrInternal => "protected internal",
            Accessibility::Public => "public",
        }
    }

    /// Parse a host keyword spelling. Both word orders of the two-word levels are accepted.
    pub fn from_keyword(word: &str) -> Option<Self> {
        let normalized: Vec<&str> = word.split_whitespace().collect();
        match normalized.as_slice() {
            ["private"] => Some(Accessibility::Private),
            ["private", "protected"] | ["protected", "private"] => Some(Accessibility::ProtectedAndInternal),
            ["protected"] => Some(Accessibility::Protected),
            ["internal"] => Some(Accessibility::Internal),
            ["protected", "internal"] | ["internal", "protected"] => Some(Accessibility::ProtectedOrInternal),
            ["public"] => Some(Accessibility::Public),
            _ => None,
        }
    }

    fn rank(self) -> u8 {
        match self {
            Accessibility::Private => 0,
            Accessibility::ProtectedAndInternal => 1,
            Accessibility::Protected | Accessibility::Internal => 2,
            Accessibility::ProtectedOrInternal => 3,
            Accessibility::Public => 4,
        }
    }
}

impl PartialOrd for Accessibility {
    /// Orders by visibility; `None` for the incomparable `Internal`/`Protected` pair.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        match self.rank().cmp(&other.rank()) {
            Ordering::Equal => None,
            ordering => Some(ordering),
        }
    }
}

impl fmt::Display for Accessibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_keyword())
    }
}

/// Error returned when an accessibility spelling is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAccessibility(pub String);

impl fmt::Display for UnknownAccessibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown accessibility '{}'", self.0)
    }
}

impl std::error::Error for UnknownAccessibility {}

impl FromStr for Accessibility {
    type Err = UnknownAccessibility;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Accessibility::from_keyword(s).ok_or_else(|| UnknownAccessibility(s.to_string()))
    }
}

/// Determine whether a member declared `level` may surface a public conversion from a type
/// declared `context`.
///
/// - `private`, `protected` and `private protected` members never qualify.
/// - `internal` and `protected internal` members qualify unless the context is `public`.
/// - `public` members always qualify.
pub fn is_relatively_accessible(context: Accessibility, level: Accessibility) -> bool {
    match (context, level) {
        (_, Accessibility::Private | Accessibility::ProtectedAndInternal | Accessibility::Protected) => false,
        (Accessibility::Public, Accessibility::Internal | Accessibility::ProtectedOrInternal) => false,
        _ => true,
    }
}

/// Walk a chain of contexts (innermost first) and return the first context that rejects `level`.
pub fn first_rejecting_context<I>(contexts: I, level: Accessibility) -> Option<Accessibility>
where
    I: IntoIterator<Item = Accessibility>,
{
    contexts
        .into_iter()
        .find(|&context| !is_relatively_accessible(context, level))
}
