//! Install-type step: the interactive half of mirror selection.
//!
//! The step owns the install-type gate and the live mirror list. A presenter
//! (TUI, GUI or the `mirrorsel` CLI) drives it through the methods below and
//! forwards the returned events. When the interactive phase ends,
//! [`InstallTypeStep::create_jobs`] hands the provisioning work to the job
//! queue.

use crate::job::JobList;
use crate::update_mirror_list::UpdateMirrorListJob;
use mirror_core::config::InstallTypeConfig;
use mirror_core::context::{ContextStore, UPDATE_MIRROR_LIST_KEY};
use mirror_core::install_type::{Advisory, InstallType, InstallTypeGate};
use mirror_core::network::Connectivity;
use mirror_core::selection::{lock_shared, MirrorList, SharedMirrorList};
use mirror_core::MirrorEvent;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

pub struct InstallTypeStep {
    context: Arc<dyn ContextStore>,
    config: InstallTypeConfig,
    gate: InstallTypeGate,
    mirrors: SharedMirrorList,
    target_dir: Option<PathBuf>,
}

impl InstallTypeStep {
    pub fn new(context: Arc<dyn ContextStore>, connectivity: Arc<dyn Connectivity>) -> Self {
        Self {
            gate: InstallTypeGate::new(Arc::clone(&context), connectivity),
            mirrors: MirrorList::new(Arc::clone(&context)).into_shared(),
            config: InstallTypeConfig::default(),
            target_dir: None,
            context,
        }
    }

    pub fn pretty_name(&self) -> String {
        "Install Type".to_string()
    }

    /// Applies the step configuration and seeds the update-mirror-list flag
    /// in the context from it.
    pub fn set_configuration(&mut self, config: InstallTypeConfig) {
        self.context.insert(
            UPDATE_MIRROR_LIST_KEY,
            Value::Bool(config.update_mirror_list),
        );
        self.config = config;
    }

    pub fn config(&self) -> &InstallTypeConfig {
        &self.config
    }

    /// Overrides the directory the apply job writes into. Without an
    /// override the configured `mirrorlist_dir` is used.
    pub fn set_target_dir(&mut self, dir: impl Into<PathBuf>) {
        self.target_dir = Some(dir.into());
    }

    /// Called every time the step becomes visible.
    ///
    /// Republishes the install type and loads the mirror list unless a
    /// previous activation already produced a non-empty catalog.
    pub fn on_activate(&mut self) -> Vec<MirrorEvent> {
        self.gate.activate();

        let mut mirrors = lock_shared(&self.mirrors);
        if mirrors.is_loaded() {
            return Vec::new();
        }
        log::info!(
            "Install Type: loading mirror list from {}",
            self.config.mirror_list_source_path.display()
        );
        mirrors.load(&self.config.mirror_list_source_path)
    }

    pub fn install_type(&self) -> InstallType {
        self.gate.install_type()
    }

    pub fn select_install_type(&mut self, install_type: InstallType) -> Option<Advisory> {
        self.gate.select(install_type)
    }

    pub fn update_mirror_list(&self) -> bool {
        self.gate.update_mirror_list()
    }

    pub fn set_update_mirror_list(&mut self, enabled: bool) {
        self.gate.set_update_mirror_list(enabled);
    }

    pub fn select_region(&mut self, region: &str) -> Vec<MirrorEvent> {
        lock_shared(&self.mirrors).set_selected_region(region)
    }

    pub fn select_server(&mut self, index: Option<usize>) -> Vec<MirrorEvent> {
        lock_shared(&self.mirrors).set_server_index(index)
    }

    /// The live mirror list, shared with any job created from this step.
    pub fn mirrors(&self) -> SharedMirrorList {
        Arc::clone(&self.mirrors)
    }

    /// Builds the provisioning jobs for this step.
    ///
    /// The update-mirror-list flag is read from the context once, here;
    /// changing it afterwards does not add or remove the job.
    pub fn create_jobs(&self) -> JobList {
        let mut jobs: JobList = Vec::new();
        if self.context.get_bool(UPDATE_MIRROR_LIST_KEY) {
            let target_dir = self
                .target_dir
                .clone()
                .unwrap_or_else(|| self.config.mirrorlist_dir.clone());
            jobs.push(Box::new(UpdateMirrorListJob::new(
                self.mirrors(),
                target_dir,
                self.config.mirrorlist_file.clone(),
            )));
        }
        jobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirror_core::context::{MemoryContext, INSTALL_TYPE_KEY, MIRROR_REGION_KEY};
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    const DOC: &str = "## header\n\n## Austria\n#Server = https://mirror.easyname.at/archlinux/$repo/os/$arch\n";

    fn step(dir: &Path, online: bool) -> (Arc<MemoryContext>, InstallTypeStep) {
        let source = dir.join("source-mirrorlist");
        fs::write(&source, DOC).unwrap();
        let ctx = Arc::new(MemoryContext::new());
        let probe: Arc<dyn Connectivity> = Arc::new(move || online);
        let mut step = InstallTypeStep::new(ctx.clone(), probe);
        step.set_configuration(InstallTypeConfig {
            mirror_list_source_path: source,
            mirrorlist_dir: dir.to_path_buf(),
            ..InstallTypeConfig::default()
        });
        (ctx, step)
    }

    #[test]
    fn configuration_seeds_update_flag() {
        let dir = tempdir().unwrap();
        let (ctx, mut step) = step(dir.path(), true);
        assert!(!ctx.get_bool(UPDATE_MIRROR_LIST_KEY));
        step.set_configuration(InstallTypeConfig {
            update_mirror_list: true,
            ..step.config().clone()
        });
        assert!(ctx.get_bool(UPDATE_MIRROR_LIST_KEY));
        step.on_activate();
        assert!(step.update_mirror_list());
    }

    #[test]
    fn activation_loads_once() {
        let dir = tempdir().unwrap();
        let (ctx, mut step) = step(dir.path(), true);

        assert_eq!(step.on_activate(), vec![MirrorEvent::Loaded]);
        assert_eq!(ctx.get(INSTALL_TYPE_KEY), Some(Value::Bool(false)));
        assert_eq!(ctx.get_string(MIRROR_REGION_KEY), "Austria");

        assert!(step.on_activate().is_empty());
    }

    #[test]
    fn activation_retries_failed_load() {
        let dir = tempdir().unwrap();
        let (_ctx, mut step) = step(dir.path(), true);
        fs::remove_file(dir.path().join("source-mirrorlist")).unwrap();

        let events = step.on_activate();
        assert!(matches!(events.as_slice(), [MirrorEvent::LoadFailed(_)]));

        fs::write(dir.path().join("source-mirrorlist"), DOC).unwrap();
        let events = step.on_activate();
        assert_eq!(events.last(), Some(&MirrorEvent::Loaded));
    }

    #[test]
    fn no_job_without_update_flag() {
        let dir = tempdir().unwrap();
        let (_ctx, mut step) = step(dir.path(), true);
        step.on_activate();
        assert!(step.create_jobs().is_empty());
    }

    #[test]
    fn one_job_with_update_flag() {
        let dir = tempdir().unwrap();
        let (_ctx, mut step) = step(dir.path(), true);
        step.on_activate();
        step.set_update_mirror_list(true);

        let jobs = step.create_jobs();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].pretty_name(), "Update mirror list");

        // The flag is only consulted at hand-off.
        step.set_update_mirror_list(false);
        assert!(jobs[0].exec(false).is_ok());
        assert!(dir.path().join("mirrorlist").exists());
    }

    #[test]
    fn online_refused_without_connectivity() {
        let dir = tempdir().unwrap();
        let (ctx, mut step) = step(dir.path(), false);
        step.on_activate();

        let advisory = step.select_install_type(InstallType::Online);
        assert_eq!(advisory, Some(Advisory::no_internet()));
        assert_eq!(step.install_type(), InstallType::Offline);
        assert!(!ctx.get_bool(INSTALL_TYPE_KEY));
    }

    #[test]
    fn target_dir_override_is_used() {
        let dir = tempdir().unwrap();
        let (_ctx, mut step) = step(dir.path(), true);
        let target = dir.path().join("target");
        fs::create_dir(&target).unwrap();
        step.set_target_dir(&target);
        step.on_activate();
        step.set_update_mirror_list(true);

        let jobs = step.create_jobs();
        assert!(jobs[0].exec(false).is_ok());
        assert!(target.join("mirrorlist").exists());
    }
}
