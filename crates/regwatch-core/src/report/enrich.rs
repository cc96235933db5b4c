//! Enrichment collaborator contract.
//!
//! An enricher turns one `Change` into natural-language prose. It may be
//! unavailable (`Ok(None)`), fail (`Err`) or panic; the report builder
//! treats each as a per-entry fallback. Retries, timeouts and credentials are the
//! enricher's own business.

use crate::diff::Change;
use crate::errors::Result;

/// Capability-typed explanation source for a single change.
pub trait Enricher: Send + Sync {
    /// Short name recorded in reports
    fn name(&self) -> &str;

    /// Explain one change.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying service. The report builder recovers
    /// from it for this change only.
    fn explain(&self, change: &Change) -> Result<Option<String>>;
}

/// Enricher used when no enrichment service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnricher;

impl Enricher for NoEnricher {
    fn name(&self) -> &str {
        "none"
    }

    fn explain(&self, _change: &Change) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Adapter turning a closure into an `Enricher`.
pub struct FnEnricher<F> {
    name: String,
    f: F,
}

impl<F> FnEnricher<F>
where
    F: Fn(&Change) -> Result<Option<String>> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Enricher for FnEnricher<F>
where
    F: Fn(&Change) -> Result<Option<String>> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn explain(&self, change: &Change) -> Result<Option<String>> {
        (self.f)(change)
    }
}

impl<E: Enricher + ?Sized> Enricher for std::sync::Arc<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn explain(&self, change: &Change) -> Result<Option<String>> {
        (**self).explain(change)
    }
}
