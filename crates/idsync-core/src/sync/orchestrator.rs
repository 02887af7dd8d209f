//! Sync orchestration - coordinates the export and import passes

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::actions::{ImportAction, ImportActionResolver};
use super::executor::ExportWriter;
use super::policy::ExclusionPolicy;
use super::{Outcome, PlannedAction, SkipReason, SyncResult};
use crate::config::ToolConfig;
use crate::error::{Result, SyncError};
use crate::handler::{ResourceHandler, ResourceUpload};
use crate::keywords::{KeywordResolver, TemplateEngine};
use crate::resource::{
    Format, LocalResourceFile, RemoteResource, ResourceKind, declared_name, scan_directory,
};

/// Main sync engine
///
/// Holds the resolved settings for one resource type. The same engine can
/// run any number of passes; it keeps no state between them.
pub struct SyncEngine {
    config: ToolConfig,
    dry_run: bool,
    interrupt: Option<Arc<AtomicBool>>,
}

impl SyncEngine {
    /// Create a new sync engine
    #[must_use]
    pub const fn new(config: ToolConfig) -> Self {
        Self {
            config,
            dry_run: false,
            interrupt: None,
        }
    }

    /// Plan mutations without performing them
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Stop issuing operations once `flag` is set
    #[must_use]
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Export every deployed resource of the handler's type into `dir`
    ///
    /// # Errors
    ///
    /// Returns an error only if the handler cannot list deployed resources.
    /// Individual export or write failures are recorded in the result.
    pub fn export(
        &self,
        handler: &dyn ResourceHandler,
        dir: &Path,
        format: Format,
    ) -> Result<SyncResult> {
        let kind = handler.kind();
        let mut result = SyncResult::default();

        let mut remote = handler.list()?;
        let synthetic = uncovered_synthetics(handler, &remote);
        remote.extend(synthetic);
        tracing::debug!(kind = %kind, count = remote.len(), "listed deployed resources");

        let writer = ExportWriter::new(dir);

        for resource in &remote {
            if self.is_interrupted() {
                result.interrupted = true;
                break;
            }

            if ExclusionPolicy::is_excluded(&resource.name, &self.config) {
                tracing::info!(kind = %kind, resource = %resource.name, "excluded from export");
                result.record(&resource.name, Outcome::Skipped(SkipReason::Excluded));
                continue;
            }

            let outcome = self.export_one(handler, &writer, resource, format);
            log_outcome(kind, &resource.name, &outcome);
            result.record(&resource.name, outcome);
        }

        Ok(result)
    }

    /// Push every resource file in `dir` to the handler's type
    ///
    /// A missing directory means there is nothing to import; the server is
    /// not contacted and nothing is deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` cannot be read or the handler cannot list
    /// deployed resources. Individual failures are recorded in the result.
    pub fn import(&self, handler: &dyn ResourceHandler, dir: &Path) -> Result<SyncResult> {
        let kind = handler.kind();
        let mut result = SyncResult::default();

        if !dir.is_dir() {
            tracing::info!(kind = %kind, dir = %dir.display(), "nothing to import");
            return Ok(result);
        }

        let scan = scan_directory(dir)?;
        for path in &scan.ignored {
            let name = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
            tracing::debug!(kind = %kind, resource = %name, "not a resource file");
            result.record(name, Outcome::Skipped(SkipReason::NoOp));
        }

        let deployed = handler.list()?;
        let synthetic = uncovered_synthetics(handler, &deployed);
        tracing::debug!(
            kind = %kind,
            local = scan.files.len(),
            deployed = deployed.len(),
            "resolved import inputs"
        );

        if self.config.allow_delete {
            for resource in deployed.iter().filter(|r| !scan.contains(&r.name)) {
                if self.is_interrupted() {
                    result.interrupted = true;
                    return Ok(result);
                }
                if ExclusionPolicy::is_excluded(&resource.name, &self.config) {
                    continue;
                }

                let outcome = self.delete_one(handler, resource);
                log_outcome(kind, &resource.name, &outcome);
                result.record(&resource.name, outcome);
            }
        }

        for file in &scan.files {
            if self.is_interrupted() {
                result.interrupted = true;
                break;
            }

            if ExclusionPolicy::is_excluded(&file.name, &self.config) {
                tracing::info!(kind = %kind, resource = %file.name, "excluded from import");
                result.record(&file.name, Outcome::Skipped(SkipReason::Excluded));
                continue;
            }

            let outcome = self.import_one(handler, file, &deployed, &synthetic, &mut result);
            log_outcome(kind, &file.name, &outcome);
            result.record(&file.name, outcome);
        }

        Ok(result)
    }

    fn export_one(
        &self,
        handler: &dyn ResourceHandler,
        writer: &ExportWriter<'_>,
        resource: &RemoteResource,
        format: Format,
    ) -> Outcome {
        let exported = match handler.export(resource, format, self.config.exclude_secrets) {
            Ok(exported) => exported,
            Err(e) => return Outcome::Failed(e),
        };

        let mapping = KeywordResolver::resolve(&resource.name, &self.config);
        let content = TemplateEngine::insert_placeholders(&exported.content, &mapping);

        if self.dry_run {
            return Outcome::Planned(PlannedAction::Write);
        }

        match writer.write(&exported.file_name, &content, &resource.name) {
            Ok(path) => Outcome::Exported(path),
            Err(e) => Outcome::Failed(e),
        }
    }

    fn delete_one(&self, handler: &dyn ResourceHandler, resource: &RemoteResource) -> Outcome {
        if self.dry_run {
            return Outcome::Planned(PlannedAction::Delete);
        }

        match handler.delete(resource) {
            Ok(()) => Outcome::Deleted,
            Err(e) => Outcome::Failed(SyncError::Delete {
                resource: resource.name.clone(),
                source: Box::new(e),
            }),
        }
    }

    fn import_one(
        &self,
        handler: &dyn ResourceHandler,
        file: &LocalResourceFile,
        deployed: &[RemoteResource],
        synthetic: &[RemoteResource],
        result: &mut SyncResult,
    ) -> Outcome {
        let raw = match fs::read_to_string(&file.path) {
            Ok(raw) => raw,
            Err(source) => {
                return Outcome::Failed(SyncError::Io {
                    resource: file.name.clone(),
                    path: file.path.clone(),
                    source,
                });
            }
        };

        let mapping = KeywordResolver::resolve(&file.name, &self.config);
        let content = match TemplateEngine::fill_placeholders(&raw, &mapping, &file.name) {
            Ok(content) => content,
            Err(e) => return Outcome::Failed(e),
        };

        // Placeholders make the raw file unparsable, so identify after filling.
        match declared_name(&content, file.format, handler.identifying_field(), &file.name) {
            Ok(declared) if declared != file.name => {
                let warning = format!(
                    "{}: declares name '{declared}' but file name is used for matching",
                    file.name
                );
                tracing::warn!(
                    kind = %handler.kind(),
                    resource = %file.name,
                    declared = %declared,
                    "declared name differs from file name"
                );
                result.warnings.push(warning);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(
                    kind = %handler.kind(),
                    resource = %file.name,
                    error = %e,
                    "invalid resource file"
                );
                result.warnings.push(e.to_string());
                return Outcome::Skipped(SkipReason::Invalid);
            }
        }

        let upload = ResourceUpload {
            name: &file.name,
            file_name: &file.file_name,
            format: file.format,
            content: &content,
        };

        let descriptor = ImportActionResolver::resolve(handler.kind(), file, deployed, synthetic);
        tracing::debug!(
            kind = %descriptor.kind,
            resource = %descriptor.name,
            remote_id = ?descriptor.remote_id,
            format = %descriptor.format,
            "matched against deployed resources"
        );

        match ImportAction::from(&descriptor) {
            ImportAction::Update { id } => {
                if self.dry_run {
                    return Outcome::Planned(PlannedAction::Update);
                }
                match handler.update(&id, &upload) {
                    Ok(()) => Outcome::Updated,
                    Err(e) => Outcome::Failed(e),
                }
            }
            ImportAction::Create => {
                if self.dry_run {
                    return Outcome::Planned(PlannedAction::Create);
                }
                match handler.create(&upload) {
                    Ok(()) => Outcome::Created,
                    Err(e) if e.is_conflict() => Self::retry_as_update(handler, &upload, e),
                    Err(e) => Outcome::Failed(e),
                }
            }
        }
    }

    /// Resolve a conflicting create by name and update it, exactly once
    fn retry_as_update(
        handler: &dyn ResourceHandler,
        upload: &ResourceUpload<'_>,
        conflict: SyncError,
    ) -> Outcome {
        tracing::info!(
            kind = %handler.kind(),
            resource = %upload.name,
            "create conflicted, retrying as update"
        );

        let deployed = match handler.list() {
            Ok(deployed) => deployed,
            Err(e) => return Outcome::Failed(e),
        };

        let Some(existing) = deployed.iter().find(|r| r.name == upload.name) else {
            return Outcome::Failed(conflict);
        };

        match handler.update(&existing.id, upload) {
            Ok(()) => Outcome::Updated,
            Err(e) => Outcome::Failed(e),
        }
    }

    fn is_interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

/// Synthetic entries of the handler that `listed` does not already cover
fn uncovered_synthetics(
    handler: &dyn ResourceHandler,
    listed: &[RemoteResource],
) -> Vec<RemoteResource> {
    handler
        .synthetic_entries()
        .into_iter()
        .filter(|s| !listed.iter().any(|r| r.id == s.id || r.name == s.name))
        .collect()
}

fn log_outcome(kind: ResourceKind, name: &str, outcome: &Outcome) {
    match outcome {
        Outcome::Exported(path) => {
            tracing::info!(kind = %kind, resource = %name, path = %path.display(), "exported");
        }
        Outcome::Created => tracing::info!(kind = %kind, resource = %name, "created"),
        Outcome::Updated => tracing::info!(kind = %kind, resource = %name, "updated"),
        Outcome::Deleted => tracing::info!(kind = %kind, resource = %name, "deleted"),
        Outcome::Skipped(reason) => {
            tracing::info!(kind = %kind, resource = %name, %reason, "skipped");
        }
        Outcome::Planned(action) => {
            tracing::info!(kind = %kind, resource = %name, %action, "[DRY RUN] would apply");
        }
        Outcome::Failed(err) => {
            tracing::error!(kind = %kind, resource = %name, error = %err, "failed");
        }
    }
}
