//! Field paths for diagnostics.
//!
//! A [`Path`] identifies one field within a (possibly nested or
//! collection-valued) mapping operation, rendered in the familiar
//! dot/bracket form: `address.zip`, `tags[1]`, `orders[0].total`.

use std::fmt;

/// One step in a [`Path`]: a named field or a collection index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Descent into a named property.
    Field(String),
    /// Descent into a collection element.
    Index(usize),
}

/// A dot/bracket-qualified field path, root-relative.
///
/// The root path renders as `$`; everything else renders without a
/// leading `$` so that top-level fields read as plain names (`age`,
/// not `$.age`), matching how mapping diagnostics are reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Returns the root path (no segments).
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns `true` if this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns a new path extended with a field segment.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Field(name.to_string()));
        Self { segments }
    }

    /// Returns a new path extended with an index segment.
    #[must_use]
    pub fn index(&self, i: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(i));
        Self { segments }
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("$");
        }
        let mut first = true;
        for segment in &self.segments {
            match segment {
                Segment::Field(name) => {
                    if !first {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                Segment::Index(i) => write!(f, "[{i}]")?,
            }
            first = false;
        }
        Ok(())
    }
}
