//! Provisioning job that commits the chosen mirror to the target system.

use crate::job::{Job, JobResult};
use mirror_core::atomic::write_atomic;
use mirror_core::errors::ApplyError;
use mirror_core::mirrorlist::render_single;
use mirror_core::selection::{lock_shared, SharedMirrorList};
use std::path::{Path, PathBuf};

pub struct UpdateMirrorListJob {
    mirrors: SharedMirrorList,
    target_dir: PathBuf,
    target_file: String,
}

impl UpdateMirrorListJob {
    pub fn new(
        mirrors: SharedMirrorList,
        target_dir: impl Into<PathBuf>,
        target_file: impl Into<String>,
    ) -> Self {
        Self {
            mirrors,
            target_dir: target_dir.into(),
            target_file: target_file.into(),
        }
    }

    pub fn target_path(&self) -> PathBuf {
        self.target_dir.join(&self.target_file)
    }

    /// Renders the document for the selection as it is right now.
    fn render(&self) -> Result<String, ApplyError> {
        let mirrors = lock_shared(&self.mirrors);
        let region = mirrors.selected_region();
        let server = mirrors.selected_full_server();
        if region.is_empty() || server.is_empty() {
            return Err(ApplyError::NothingSelected);
        }
        Ok(render_single(region, server))
    }

    fn write(&self, path: &Path, document: &str) -> Result<(), ApplyError> {
        write_atomic(path, document.as_bytes()).map_err(|source| ApplyError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Job for UpdateMirrorListJob {
    fn pretty_name(&self) -> String {
        "Update mirror list".to_string()
    }

    fn exec(&self, dry_run: bool) -> JobResult {
        let path = self.target_path();
        let document = match self.render() {
            Ok(document) => document,
            Err(err) => {
                return JobResult::failed(
                    "Cannot update mirror list",
                    format!("{} for {}", err, path.display()),
                )
            }
        };

        if dry_run {
            log::info!("DRY RUN: would write mirror list {}", path.display());
            log::info!("DRY RUN: {}", document.trim_end().replace('\n', " | "));
            return JobResult::Ok;
        }

        match self.write(&path, &document) {
            Ok(()) => {
                log::info!("Mirror list written: {}", path.display());
                JobResult::Ok
            }
            Err(err) => JobResult::failed("Cannot update mirror list", err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirror_core::context::MemoryContext;
    use mirror_core::selection::MirrorList;
    use mirror_core::MirrorCatalog;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    const DOC: &str = "\
## header

## Austria
#Server = https://mirror.easyname.at/archlinux/$repo/os/$arch
## Belgium
#Server = http://mirror.example.be/archlinux/$repo/os/$arch
#Server = https://other.example.be/archlinux/$repo/os/$arch
";

    fn shared_list(dir: &Path) -> SharedMirrorList {
        let source = dir.join("source-mirrorlist");
        fs::write(&source, DOC).unwrap();
        let mut list = MirrorList::new(Arc::new(MemoryContext::new()));
        list.load(&source);
        list.into_shared()
    }

    #[test]
    fn writes_selected_mirror() {
        let dir = tempdir().unwrap();
        let mirrors = shared_list(dir.path());
        let job = UpdateMirrorListJob::new(mirrors, dir.path(), "mirrorlist");

        assert_eq!(job.exec(false), JobResult::Ok);

        let written = fs::read_to_string(dir.path().join("mirrorlist")).unwrap();
        let catalog = MirrorCatalog::parse(&written);
        assert_eq!(catalog.region_names(), &["Austria"]);
        assert_eq!(
            catalog.servers("Austria")[0].canonical_url,
            "https://mirror.easyname.at/archlinux/$repo/os/$arch"
        );
    }

    #[test]
    fn reads_selection_at_execution_time() {
        let dir = tempdir().unwrap();
        let mirrors = shared_list(dir.path());
        let job = UpdateMirrorListJob::new(Arc::clone(&mirrors), dir.path(), "mirrorlist");

        {
            let mut list = lock_shared(&mirrors);
            list.set_selected_region("Belgium");
            list.set_server_index(Some(1));
        }
        assert!(job.exec(false).is_ok());

        let written = fs::read_to_string(job.target_path()).unwrap();
        assert!(written.contains("\n## Belgium\n"));
        assert!(written.contains("#Server = https://other.example.be/archlinux/$repo/os/$arch\n"));
        assert_eq!(written.matches("#Server").count(), 1);
    }

    #[test]
    fn missing_target_directory_fails_the_job() {
        let dir = tempdir().unwrap();
        let mirrors = shared_list(dir.path());
        let job = UpdateMirrorListJob::new(mirrors, dir.path().join("absent"), "mirrorlist");

        match job.exec(false) {
            JobResult::Failed { message, details } => {
                assert_eq!(message, "Cannot update mirror list");
                assert!(details.contains("absent"));
            }
            JobResult::Ok => panic!("expected failure"),
        }
    }

    #[test]
    fn empty_selection_fails_the_job() {
        let dir = tempdir().unwrap();
        let mirrors = shared_list(dir.path());
        lock_shared(&mirrors).set_server_index(None);
        let job = UpdateMirrorListJob::new(mirrors, dir.path(), "mirrorlist");

        let result = job.exec(false);
        assert!(matches!(&result, JobResult::Failed { details, .. } if details.contains("No mirror selected")));
        assert!(!dir.path().join("mirrorlist").exists());
    }

    #[test]
    fn dry_run_leaves_target_untouched() {
        let dir = tempdir().unwrap();
        let mirrors = shared_list(dir.path());
        let job = UpdateMirrorListJob::new(mirrors, dir.path(), "mirrorlist");

        assert!(job.exec(true).is_ok());
        assert!(!dir.path().join("mirrorlist").exists());
    }
}
