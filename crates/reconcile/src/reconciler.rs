use std::io;
use std::path::Path;

use filespec::{Content, ContentResolver, FileSpec, OctalPerms, SpecError};
use logging::{trace_content, trace_group, trace_own, trace_perms};

use crate::error::ReconcileError;
use crate::options::ReconcileOptions;
use crate::report::{Change, ReconcileReport};
use crate::service::{Filesystem, Identity};

/// Converges filesystem entries toward [`FileSpec`] values.
///
/// The reconciler owns its services and options but keeps no state between
/// calls; the same instance can reconcile any number of specifications.
pub struct Reconciler<F, I> {
    filesystem: F,
    identity: I,
    options: ReconcileOptions,
    resolver: Option<Box<dyn ContentResolver>>,
}

impl<F, I> Reconciler<F, I>
where
    F: Filesystem,
    I: Identity,
{
    /// Creates a reconciler with default [`ReconcileOptions`] and no
    /// content resolver.
    pub fn new(filesystem: F, identity: I) -> Self {
        Self {
            filesystem,
            identity,
            options: ReconcileOptions::new(),
            resolver: None,
        }
    }

    /// Replaces the options.
    #[must_use]
    pub fn with_options(mut self, options: ReconcileOptions) -> Self {
        self.options = options;
        self
    }

    /// Installs the resolver used for [`Content::Deferred`] bodies.
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl ContentResolver + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Returns the active options.
    pub const fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Returns the filesystem service.
    pub const fn filesystem(&self) -> &F {
        &self.filesystem
    }

    /// Returns the identity service.
    pub const fn identity(&self) -> &I {
        &self.identity
    }

    /// Compares `spec` with the entry at its path and applies the differences.
    ///
    /// Permissions, owner, group and content are handled in that order, each
    /// only when set on the spec. Owner and group each take a fresh stat so
    /// the id they preserve reflects the entry at that moment.
    ///
    /// # Errors
    ///
    /// - [`SpecError::MissingPath`] when the spec has no path, before any
    ///   service call.
    /// - [`SpecError::UnresolvedContent`] when the body is a deferred
    ///   reference and no resolver is installed, also before any service call.
    /// - Any service failure, unchanged. Steps that already succeeded stay
    ///   applied.
    pub fn reconcile(&self, spec: &FileSpec) -> Result<ReconcileReport, ReconcileError> {
        let path = spec.require_path()?;
        if let Some(Content::Deferred(reference)) = spec.content()
            && self.resolver.is_none()
        {
            return Err(SpecError::UnresolvedContent {
                name: reference.name().to_owned(),
            }
            .into());
        }

        let mut report = ReconcileReport::new(path, self.options.dry_run_enabled());

        if let Some(perms) = spec.octal_perms() {
            self.reconcile_permissions(path, perms, &mut report)?;
        }
        if let Some(owner) = spec.owner() {
            self.reconcile_owner(path, owner, &mut report)?;
        }
        if let Some(group) = spec.group() {
            self.reconcile_group(path, group, &mut report)?;
        }
        if let Some(content) = spec.content() {
            self.reconcile_content(path, content, &mut report)?;
        }

        Ok(report)
    }

    fn reconcile_permissions(
        &self,
        path: &Path,
        perms: &OctalPerms,
        report: &mut ReconcileReport,
    ) -> Result<(), ReconcileError> {
        let current = self.filesystem.stat(path)?.permission_bits();
        let desired = perms.bits();
        if current == desired {
            trace_perms!(debug, path = %path.display(), "permissions already {:04o}", current);
            return Ok(());
        }

        trace_perms!(info, path = %path.display(), "chmod {:04o} -> {:04o}", current, desired);
        if !self.options.dry_run_enabled() {
            self.filesystem.chmod(path, desired)?;
        }
        report.push(Change::Permissions {
            from: current,
            to: desired,
        });
        Ok(())
    }

    fn reconcile_owner(
        &self,
        path: &Path,
        owner: &str,
        report: &mut ReconcileReport,
    ) -> Result<(), ReconcileError> {
        let stat = self.filesystem.stat(path)?;
        let current_name = self.identity.user_name_for_id(stat.uid)?;
        if current_name.as_deref() == Some(owner) {
            trace_own!(debug, path = %path.display(), uid = stat.uid, "owner already {}", owner);
            return Ok(());
        }

        let uid = self.identity.user_id_for_name(owner)?;
        if uid == stat.uid {
            // Another name for the same account.
            trace_own!(debug, path = %path.display(), uid, "{} shares the current uid", owner);
            return Ok(());
        }

        trace_own!(info, path = %path.display(), from = stat.uid, to = uid, "chown to {}", owner);
        if !self.options.dry_run_enabled() {
            self.filesystem.chown(path, uid, stat.gid)?;
        }
        report.push(Change::Owner {
            from: stat.uid,
            to: uid,
        });
        Ok(())
    }

    fn reconcile_group(
        &self,
        path: &Path,
        group: &str,
        report: &mut ReconcileReport,
    ) -> Result<(), ReconcileError> {
        let stat = self.filesystem.stat(path)?;
        let current_name = self.identity.group_name_for_id(stat.gid)?;
        if current_name.as_deref() == Some(group) {
            trace_group!(debug, path = %path.display(), gid = stat.gid, "group already {}", group);
            return Ok(());
        }

        let gid = self.identity.group_id_for_name(group)?;
        if gid == stat.gid {
            trace_group!(debug, path = %path.display(), gid, "{} shares the current gid", group);
            return Ok(());
        }

        trace_group!(info, path = %path.display(), from = stat.gid, to = gid, "chgrp to {}", group);
        if !self.options.dry_run_enabled() {
            self.filesystem.chown(path, stat.uid, gid)?;
        }
        report.push(Change::Group {
            from: stat.gid,
            to: gid,
        });
        Ok(())
    }

    fn reconcile_content(
        &self,
        path: &Path,
        content: &Content,
        report: &mut ReconcileReport,
    ) -> Result<(), ReconcileError> {
        let body = content.resolve(self.resolver.as_deref())?;

        if self.options.compare_content_enabled() {
            match self.filesystem.read_all(path) {
                Ok(current) if current == body.as_bytes() => {
                    trace_content!(debug, path = %path.display(), bytes = current.len(), "content already matches");
                    return Ok(());
                }
                Ok(_) => {}
                Err(error) if error.kind() == io::ErrorKind::NotFound => {}
                Err(error) => return Err(error.into()),
            }
        }

        trace_content!(info, path = %path.display(), bytes = body.len(), "rewriting content");
        if !self.options.dry_run_enabled() {
            self.filesystem.write_all(path, body.as_bytes())?;
        }
        report.push(Change::Content { bytes: body.len() });
        Ok(())
    }
}

/// Reconciles `spec` with a default [`Reconciler`] over the given services.
///
/// Services are taken by value; pass references to keep ownership.
pub fn reconcile<F, I>(
    spec: &FileSpec,
    filesystem: F,
    identity: I,
) -> Result<ReconcileReport, ReconcileError>
where
    F: Filesystem,
    I: Identity,
{
    Reconciler::new(filesystem, identity).reconcile(spec)
}
