//! Path pattern matching for header rules.
//!
//! # Responsibilities
//! - Compile a header rule pattern such as `/blog/*` or `/posts/:slug`
//! - Match request paths against it, segment by segment
//!
//! # Design Decisions
//! - Segments are the non-empty pieces between `/` separators
//! - A pattern matches once its own segments run out, so `/blog` also
//!   covers `/blog/post` and `/` covers every path
//! - `*` matches the remaining segments (at least one)
//! - `:name` matches any single segment
//! - Literal segments are compared case-sensitively
//! - No regex to guarantee O(n) matching

/// One compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder,
    Splat,
}

/// A compiled header rule path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a pattern.
    pub fn new(pattern: impl Into<String>) -> Self {
        let source = pattern.into();
        let segments = split_segments(&source)
            .map(|part| {
                if part == "*" {
                    Segment::Splat
                } else if part.starts_with(':') {
                    Segment::Placeholder
                } else {
                    Segment::Literal(part.to_string())
                }
            })
            .collect();
        Self { source, segments }
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if `path` matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = split_segments(path).collect();

        // `/` and `/*` both cover the site root.
        if parts.is_empty() {
            return self.segments.is_empty() || self.segments == [Segment::Splat];
        }

        for (index, segment) in self.segments.iter().enumerate() {
            let Some(part) = parts.get(index) else {
                return false;
            };
            match segment {
                Segment::Splat => return true,
                Segment::Placeholder => {}
                Segment::Literal(literal) => {
                    if literal != part {
                        return false;
                    }
                }
            }
        }

        true
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|part| !part.is_empty())
}
