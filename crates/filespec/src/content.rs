//! Content sources accepted by [`FileSpec::set_content`](crate::FileSpec::set_content).
//!
//! A body can be given as a literal string, as a named [`ContentRef`] that is
//! resolved later by a [`ContentResolver`], or as any [`io::Read`]
//! implementation wrapped in [`Reader`]. Readers are drained immediately; the
//! captured text is what gets stored, so later changes to the source are not
//! observed.

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Read};

use crate::SpecError;

/// Desired file body as stored on a [`FileSpec`](crate::FileSpec).
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Content {
    /// A string supplied directly by the caller.
    Literal(String),
    /// Text drained from a reader at intake time.
    Captured(String),
    /// A named reference resolved when the body is needed.
    Deferred(ContentRef),
}

impl Content {
    /// Returns the body, resolving deferred references through `resolver`.
    ///
    /// Literal and captured bodies are borrowed unchanged. A deferred
    /// reference without a resolver yields [`SpecError::UnresolvedContent`].
    pub fn resolve(&self, resolver: Option<&dyn ContentResolver>) -> Result<Cow<'_, str>, SpecError> {
        match self {
            Self::Literal(text) | Self::Captured(text) => Ok(Cow::Borrowed(text)),
            Self::Deferred(reference) => {
                let Some(resolver) = resolver else {
                    return Err(SpecError::UnresolvedContent {
                        name: reference.name().to_owned(),
                    });
                };
                resolver
                    .resolve(reference.name())
                    .map(Cow::Owned)
                    .map_err(|source| SpecError::Resolve {
                        name: reference.name().to_owned(),
                        source,
                    })
            }
        }
    }
}

/// Symbolic name for content produced by the embedding system.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ContentRef(String);

impl ContentRef {
    /// Creates a reference to the content registered under `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the referenced name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

/// Produces the body for a [`ContentRef`].
pub trait ContentResolver {
    /// Returns the content registered under `name`.
    fn resolve(&self, name: &str) -> io::Result<String>;
}

impl<F> ContentResolver for F
where
    F: Fn(&str) -> io::Result<String>,
{
    fn resolve(&self, name: &str) -> io::Result<String> {
        self(name)
    }
}

/// Marks a value as a readable content source.
///
/// ```
/// use std::io::Cursor;
/// use filespec::{FileSpec, Reader};
///
/// let mut spec = FileSpec::new();
/// spec.set_content(Reader(Cursor::new("test"))).unwrap();
/// assert_eq!(spec.resolved_content().unwrap().as_deref(), Some("test"));
/// ```
#[derive(Debug)]
pub struct Reader<R>(pub R);

/// Conversion accepted by the content intake operation.
///
/// Implemented for string types, [`ContentRef`] and [`Reader`]. Other types
/// do not implement it and are rejected when the program is compiled:
///
/// ```compile_fail
/// let mut spec = filespec::FileSpec::new();
/// spec.set_content(1).unwrap();
/// ```
pub trait IntoContent {
    /// Converts the value into stored [`Content`].
    fn into_content(self) -> Result<Content, SpecError>;
}

impl IntoContent for &str {
    fn into_content(self) -> Result<Content, SpecError> {
        Ok(Content::Literal(self.to_owned()))
    }
}

impl IntoContent for String {
    fn into_content(self) -> Result<Content, SpecError> {
        Ok(Content::Literal(self))
    }
}

impl IntoContent for &String {
    fn into_content(self) -> Result<Content, SpecError> {
        Ok(Content::Literal(self.clone()))
    }
}

impl IntoContent for ContentRef {
    fn into_content(self) -> Result<Content, SpecError> {
        Ok(Content::Deferred(self))
    }
}

impl<R: Read> IntoContent for Reader<R> {
    fn into_content(self) -> Result<Content, SpecError> {
        let Self(mut reader) = self;
        let mut captured = String::new();
        reader
            .read_to_string(&mut captured)
            .map_err(|source| SpecError::ContentRead { source })?;
        Ok(Content::Captured(captured))
    }
}

impl IntoContent for Content {
    fn into_content(self) -> Result<Content, SpecError> {
        Ok(self)
    }
}
