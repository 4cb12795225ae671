//! Source buffer → result buffer bindings.
//!
//! Result buffers live in the host and can be wiped, unloaded or hidden at
//! any time without the registry being told. Every [`BufferRegistry::resolve`]
//! therefore starts with a reconciliation pass that compares each binding
//! against what the host reports and drops the ones that went stale.
//!
//! Reconciliation runs in two phases. The first only asks questions and
//! builds a plan, so a host failure there leaves the registry exactly as it
//! was. The second applies the plan: bindings whose result buffer is already
//! gone are dropped, then each teardown is issued and its binding removed once
//! the host confirms. If a teardown fails the pass stops; bindings already
//! handled stay removed and the rest are looked at again on the next call.
//!
//! Deleting a result buffer can orphan a result that was queried from it, so
//! passes repeat until one tears nothing down.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::Result;
use crate::host::{BufferId, DeleteOptions, Host};

/// Display option set on every new result buffer.
pub const DEFAULT_FILETYPE: &str = "json";

/// Why a binding was dropped during reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// The result buffer no longer exists.
    Wiped,
    /// The result buffer exists but is not loaded.
    Unloaded,
    /// The result buffer is hidden and its source buffer no longer exists.
    Orphaned,
}

impl StaleReason {
    /// Whether the host still has a buffer that must be deleted.
    pub const fn needs_teardown(self) -> bool {
        !matches!(self, Self::Wiped)
    }
}

/// What a reconciliation pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Bindings left in place.
    pub kept: usize,
    /// Bindings dropped because their result buffer was already wiped.
    pub forgotten: Vec<BufferId>,
    /// Bindings whose result buffer was deleted, with the reason.
    pub torn_down: Vec<(BufferId, StaleReason)>,
}

/// Owns the mapping from source buffers to the scratch buffers showing their
/// query results.
#[derive(Debug, Clone)]
pub struct BufferRegistry {
    bindings: BTreeMap<BufferId, BufferId>,
    filetype: String,
}

impl Default for BufferRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferRegistry {
    /// An empty registry tagging result buffers with [`DEFAULT_FILETYPE`].
    pub fn new() -> Self {
        Self::with_filetype(DEFAULT_FILETYPE)
    }

    pub fn with_filetype(filetype: impl Into<String>) -> Self {
        Self {
            bindings: BTreeMap::new(),
            filetype: filetype.into(),
        }
    }

    pub fn filetype(&self) -> &str {
        &self.filetype
    }

    /// Change the tag used for result buffers created from now on.
    pub fn set_filetype(&mut self, filetype: impl Into<String>) {
        self.filetype = filetype.into();
    }

    /// The result buffer currently bound to `source`, without reconciling.
    pub fn get(&self, source: BufferId) -> Option<BufferId> {
        self.bindings.get(&source).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// All `(source, result)` pairs, ordered by source id.
    pub fn bindings(&self) -> impl Iterator<Item = (BufferId, BufferId)> + '_ {
        self.bindings.iter().map(|(&source, &result)| (source, result))
    }

    /// Return the result buffer for `source`, creating and binding a new
    /// scratch buffer if there is none.
    ///
    /// The whole registry is reconciled first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::HostCommunication`] if any host call fails.
    pub fn resolve<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        source: BufferId,
    ) -> Result<BufferId> {
        self.reconcile(host)?;

        if let Some(result) = self.get(source) {
            return Ok(result);
        }

        let result = host.create_buffer(false, true)?;
        host.set_buffer_option(result, "filetype", &self.filetype)?;
        self.bindings.insert(source, result);
        debug!(%source, %result, "bound new result buffer");
        Ok(result)
    }

    /// Delete the result buffer bound to `source` and drop the binding.
    ///
    /// A result buffer that was already wiped is only forgotten. Returns the
    /// released result buffer, or `None` if `source` was unbound.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::HostCommunication`] if the delete fails; the
    /// binding is kept in that case.
    pub fn release<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        source: BufferId,
    ) -> Result<Option<BufferId>> {
        let Some(result) = self.get(source) else {
            return Ok(None);
        };
        if host.is_buffer_valid(result)? {
            host.delete_buffer(result, DeleteOptions::WIPE)?;
        }
        self.bindings.remove(&source);
        debug!(%source, %result, "released result buffer");
        Ok(Some(result))
    }

    /// Drop every binding whose result buffer is gone, unloaded, or hidden
    /// with its source gone.
    ///
    /// # Errors
    ///
    /// Returns an error if a host query or teardown fails. See the module
    /// docs for what is left applied in that case.
    pub fn reconcile<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<ReconcileReport> {
        let mut report = ReconcileReport::default();
        // A teardown can orphan results bound to the buffer it deleted, so
        // repeat until a pass deletes nothing.
        loop {
            let torn_down = report.torn_down.len();
            self.reconcile_pass(host, &mut report)?;
            if report.torn_down.len() == torn_down {
                return Ok(report);
            }
        }
    }

    fn reconcile_pass<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        report: &mut ReconcileReport,
    ) -> Result<()> {
        let mut plan = Vec::with_capacity(self.bindings.len());
        for (source, result) in self.bindings() {
            plan.push((source, result, judge(host, source, result)?));
        }

        report.kept = 0;
        for &(source, result, stale) in &plan {
            match stale {
                None => report.kept += 1,
                Some(reason) if !reason.needs_teardown() => {
                    self.bindings.remove(&source);
                    debug!(%source, %result, "forgot wiped result buffer");
                    report.forgotten.push(source);
                }
                Some(_) => {}
            }
        }

        for (source, result, stale) in plan {
            let Some(reason) = stale.filter(|reason| reason.needs_teardown()) else {
                continue;
            };
            host.delete_buffer(result, DeleteOptions::WIPE)?;
            self.bindings.remove(&source);
            debug!(%source, %result, ?reason, "tore down stale result buffer");
            report.torn_down.push((source, reason));
        }

        Ok(())
    }
}

/// Classify one binding using read-only host queries. `None` means keep.
fn judge<H: Host + ?Sized>(
    host: &mut H,
    source: BufferId,
    result: BufferId,
) -> Result<Option<StaleReason>> {
    if !host.is_buffer_valid(result)? {
        return Ok(Some(StaleReason::Wiped));
    }
    if !host.is_buffer_loaded(result)? {
        return Ok(Some(StaleReason::Unloaded));
    }
    if !host.is_buffer_visible(result)? && !host.is_buffer_valid(source)? {
        return Ok(Some(StaleReason::Orphaned));
    }
    Ok(None)
}
