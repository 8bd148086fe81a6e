use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// Separator between the segments of a qualified IDL name.
pub const SCOPE_SEPARATOR: &str = "::";

/// A fully qualified name such as `FirmwareUpdate::Point`.
///
/// Declarations are assigned their scoped name by the linker; an empty
/// scoped name means the declaration has not been linked yet.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ScopedName(Vec<String>);

impl ScopedName {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn root() -> Self {
        Self(Vec::new())
    }

    /* Parses `A::B`, `::A::B` and plain identifiers; empty segments are dropped */
    pub fn parse(name: &str) -> Self {
        Self(
            name.split(SCOPE_SEPARATOR)
                .map(str::trim)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }

    pub fn join(&self, other: &ScopedName) -> Self {
        let mut segments = self.0.clone();
        segments.extend(other.0.iter().cloned());
        Self(segments)
    }

    /// The enclosing scope, or `None` for the root scope.
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The innermost identifier.
    pub fn identifier(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn is_qualified(name: &str) -> bool {
        name.contains(SCOPE_SEPARATOR)
    }
}

impl fmt::Display for ScopedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(SCOPE_SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_drops_leading_separator() {
        let name = ScopedName::parse("::Demo::Point");
        assert_eq!(name.segments(), &["Demo".to_string(), "Point".to_string()]);
        assert_eq!(name.to_string(), "Demo::Point");
    }

    #[test]
    fn parent_walks_to_root() {
        let name = ScopedName::parse("A::B");
        let parent = name.parent().unwrap();
        assert_eq!(parent.to_string(), "A");
        let root = parent.parent().unwrap();
        assert!(root.is_empty());
        assert!(root.parent().is_none());
    }

    #[test]
    fn child_and_join() {
        let module = ScopedName::root().child("Demo");
        let inner = module.join(&ScopedName::parse("Shape::Anchor"));
        assert_eq!(inner.to_string(), "Demo::Shape::Anchor");
        assert_eq!(inner.identifier(), Some("Anchor"));
    }
}
