use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::content::{Content, ContentResolver, IntoContent};
use crate::perms::OctalPerms;
use crate::SpecError;

/// Desired state of a single filesystem entry.
///
/// Every attribute except the path is optional; an unset attribute is left
/// alone by reconciliation. Setters may be called in any order and any number
/// of times, the last write wins.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FileSpec {
    path: Option<PathBuf>,
    owner: Option<String>,
    group: Option<String>,
    perms: Option<OctalPerms>,
    content: Option<Content>,
}

impl FileSpec {
    /// Creates an empty specification.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            path: None,
            owner: None,
            group: None,
            perms: None,
            content: None,
        }
    }

    /// Creates a specification for `path`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::new()
        }
    }

    /// Returns the managed path, if set.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Sets the managed path.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.path = Some(path.into());
        self
    }

    /// Returns the managed path or [`SpecError::MissingPath`].
    pub fn require_path(&self) -> Result<&Path, SpecError> {
        self.path().ok_or(SpecError::MissingPath)
    }

    /// Returns the desired owner name.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Sets the desired owner by user name.
    pub fn set_owner(&mut self, owner: impl Into<String>) -> &mut Self {
        self.owner = Some(owner.into());
        self
    }

    /// Stops managing the owner.
    pub fn clear_owner(&mut self) -> &mut Self {
        self.owner = None;
        self
    }

    /// Builder form of [`Self::set_owner`].
    #[must_use]
    pub fn owned_by(mut self, owner: impl Into<String>) -> Self {
        self.set_owner(owner);
        self
    }

    /// Returns the desired group name.
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Sets the desired group by group name.
    pub fn set_group(&mut self, group: impl Into<String>) -> &mut Self {
        self.group = Some(group.into());
        self
    }

    /// Stops managing the group.
    pub fn clear_group(&mut self) -> &mut Self {
        self.group = None;
        self
    }

    /// Builder form of [`Self::set_group`].
    #[must_use]
    pub fn grouped_by(mut self, group: impl Into<String>) -> Self {
        self.set_group(group);
        self
    }

    /// Returns the desired permission string exactly as it was set.
    pub fn perms(&self) -> Option<&str> {
        self.perms.as_ref().map(OctalPerms::as_str)
    }

    /// Returns the numeric permission bits described by [`Self::perms`].
    pub fn permission_bits(&self) -> Option<u32> {
        self.perms.as_ref().map(OctalPerms::bits)
    }

    /// Returns the validated permission value.
    pub const fn octal_perms(&self) -> Option<&OctalPerms> {
        self.perms.as_ref()
    }

    /// Sets the desired permissions from an octal string such as `"755"`.
    ///
    /// Only strings are accepted; numeric modes are easy to confuse with
    /// their decimal spelling and do not compile:
    ///
    /// ```compile_fail
    /// let mut spec = filespec::FileSpec::new();
    /// spec.set_perms(0o755).unwrap();
    /// ```
    ///
    /// A string that is not 1 to 4 octal digits fails with
    /// [`SpecError::InvalidPermissions`] and leaves the previous value intact.
    pub fn set_perms(&mut self, perms: impl Into<String>) -> Result<&mut Self, SpecError> {
        self.perms = Some(OctalPerms::new(perms)?);
        Ok(self)
    }

    /// Stops managing permissions.
    pub fn clear_perms(&mut self) -> &mut Self {
        self.perms = None;
        self
    }

    /// Builder form of [`Self::set_perms`].
    pub fn with_perms(mut self, perms: impl Into<String>) -> Result<Self, SpecError> {
        self.set_perms(perms)?;
        Ok(self)
    }

    /// Returns the stored content source.
    pub const fn content(&self) -> Option<&Content> {
        self.content.as_ref()
    }

    /// Sets the desired body.
    ///
    /// Accepts a string, a [`ContentRef`](crate::ContentRef) or a
    /// [`Reader`](crate::Reader). Readers are consumed before this returns.
    /// On failure the previous content is kept.
    pub fn set_content(&mut self, content: impl IntoContent) -> Result<&mut Self, SpecError> {
        self.content = Some(content.into_content()?);
        Ok(self)
    }

    /// Stops managing the body.
    pub fn clear_content(&mut self) -> &mut Self {
        self.content = None;
        self
    }

    /// Returns the body as a string, or `None` when content is unset.
    ///
    /// Deferred references fail with [`SpecError::UnresolvedContent`]; use
    /// [`Self::resolved_content_with`] to supply a resolver.
    pub fn resolved_content(&self) -> Result<Option<Cow<'_, str>>, SpecError> {
        self.content.as_ref().map(|content| content.resolve(None)).transpose()
    }

    /// Returns the body, resolving deferred references through `resolver`.
    pub fn resolved_content_with(
        &self,
        resolver: &dyn ContentResolver,
    ) -> Result<Option<Cow<'_, str>>, SpecError> {
        self.content
            .as_ref()
            .map(|content| content.resolve(Some(resolver)))
            .transpose()
    }
}
