use std::fmt;

use serde_json::Value;

/// One step in a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// An object key.
    Key(String),
    /// An array index.
    Index(usize),
    /// The wildcard: every element of the array at this position.
    Any,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "{index}"),
            Segment::Any => f.write_str("#"),
        }
    }
}

/// A dot-delimited path into a GraphQL response.
///
/// All-digit segments index into arrays, `#` selects every element of the
/// array at its position, and anything else is an object key.
///
/// ```
/// use graphql_response_checks::Path;
///
/// let path = Path::parse("posts.nodes.#.title");
/// assert!(path.has_wildcard());
/// assert_eq!(path.to_string(), "posts.nodes.#.title");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Parses the dotted syntax. The empty string is the empty path.
    pub fn parse(raw: &str) -> Path {
        if raw.is_empty() {
            return Path::default();
        }

        let segments = raw
            .split('.')
            .map(|segment| match segment {
                "#" => Segment::Any,
                _ => match segment.parse::<usize>() {
                    Ok(index) => Segment::Index(index),
                    Err(_) => Segment::Key(segment.to_owned()),
                },
            })
            .collect();

        Path { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn has_wildcard(&self) -> bool {
        self.segments.iter().any(|segment| matches!(segment, Segment::Any))
    }

    /// This path extended with all segments of `tail`.
    pub fn join(&self, tail: &Path) -> Path {
        let mut segments = self.segments.clone();
        segments.extend(tail.segments.iter().cloned());
        Path { segments }
    }

    /// This path extended with one more segment.
    pub fn child(&self, segment: Segment) -> Path {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Path { segments }
    }

    /// Resolves this path against a JSON tree.
    ///
    /// Resolution never fails: an absent key, an out-of-range index or a
    /// descent into a scalar all degrade to `null`. Crossing a wildcard
    /// switches to a [`Resolved::Group`] holding one candidate per element
    /// of the array at the wildcard's position.
    pub fn resolve(&self, tree: &Value) -> Resolved {
        resolve_segments(tree, &self.segments)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut segments = self.segments.iter();
        if let Some(first) = segments.next() {
            write!(f, "{first}")?;
            for segment in segments {
                write!(f, ".{segment}")?;
            }
        }
        Ok(())
    }
}

impl From<&str> for Path {
    fn from(raw: &str) -> Self {
        Path::parse(raw)
    }
}

impl From<String> for Path {
    fn from(raw: String) -> Self {
        Path::parse(&raw)
    }
}

/// What a [`Path`] resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// The path addressed a single location. `null` when nothing was found.
    One(Value),
    /// The path crossed a wildcard: an array with one candidate per element,
    /// or the unexpanded value itself when the wildcard did not land on an
    /// array.
    Group(Value),
}

impl Resolved {
    pub fn is_group(&self) -> bool {
        matches!(self, Resolved::Group(_))
    }

    pub fn value(&self) -> &Value {
        match self {
            Resolved::One(value) | Resolved::Group(value) => value,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Resolved::One(value) | Resolved::Group(value) => value,
        }
    }
}

fn resolve_segments(tree: &Value, segments: &[Segment]) -> Resolved {
    let Some(split) = segments.iter().position(|segment| matches!(segment, Segment::Any)) else {
        return Resolved::One(lookup(tree, segments));
    };

    let elements = match lookup(tree, &segments[..split]) {
        Value::Array(elements) => elements,
        // Not a sequence, so there is nothing to fan out over. Hand the
        // value back unexpanded.
        other => return Resolved::Group(other),
    };

    let rest = &segments[split + 1..];
    let candidates = elements
        .into_iter()
        .map(|element| {
            if rest.is_empty() {
                element
            } else {
                resolve_segments(&element, rest).into_value()
            }
        })
        .collect();

    Resolved::Group(Value::Array(candidates))
}

fn lookup(tree: &Value, segments: &[Segment]) -> Value {
    let mut current = tree;
    for segment in segments {
        let next = match (segment, current) {
            (Segment::Key(key), Value::Object(map)) => map.get(key),
            (Segment::Index(index), Value::Array(items)) => items.get(*index),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return Value::Null,
        }
    }
    current.clone()
}
