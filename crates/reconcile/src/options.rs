/// Options that control how a [`Reconciler`](crate::Reconciler) applies changes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReconcileOptions {
    dry_run: bool,
    compare_content: bool,
}

impl ReconcileOptions {
    /// Creates a new [`ReconcileOptions`] value with defaults applied.
    ///
    /// By default changes are applied and the current body is compared
    /// before rewriting, so an already converged entry sees no writes.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dry_run: false,
            compare_content: true,
        }
    }

    /// Requests that changes be computed and reported but not applied.
    ///
    /// Reads and identity lookups still happen; `chmod`, `chown` and
    /// `write_all` are never called.
    #[must_use]
    #[doc(alias = "plan")]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Controls whether the current body is read and compared before writing.
    ///
    /// When disabled, a managed body is always rewritten in full.
    #[must_use]
    pub const fn compare_content(mut self, enabled: bool) -> Self {
        self.compare_content = enabled;
        self
    }

    /// Reports whether dry-run mode is enabled.
    #[must_use]
    pub const fn dry_run_enabled(&self) -> bool {
        self.dry_run
    }

    /// Reports whether content comparison is enabled.
    #[must_use]
    pub const fn compare_content_enabled(&self) -> bool {
        self.compare_content
    }
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::ReconcileOptions;

    #[test]
    fn defaults_apply_and_compare() {
        let options = ReconcileOptions::default();
        assert!(!options.dry_run_enabled());
        assert!(options.compare_content_enabled());
    }

    #[test]
    fn builders_toggle_flags() {
        let options = ReconcileOptions::new().dry_run(true).compare_content(false);
        assert!(options.dry_run_enabled());
        assert!(!options.compare_content_enabled());
    }
}
