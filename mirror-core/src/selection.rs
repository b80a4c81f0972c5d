//! Region/server selection over a loaded mirror catalog.
//!
//! [`MirrorList`] owns the catalog and the user's choice. Every change is
//! published to the installation context before the resulting
//! [`MirrorEvent`]s are handed back, so a consumer reacting to an event
//! already sees fresh values in the store.

use crate::context::{ContextStore, MIRROR_REGION_KEY, MIRROR_SERVER_KEY};
use crate::events::MirrorEvent;
use crate::mirrorlist::{MirrorCatalog, MirrorServer};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Mirror list shared between the interactive step and the provisioning job.
pub type SharedMirrorList = Arc<Mutex<MirrorList>>;

pub struct MirrorList {
    context: Arc<dyn ContextStore>,
    catalog: MirrorCatalog,
    source_path: Option<PathBuf>,
    region: String,
    server_index: Option<usize>,
}

impl MirrorList {
    pub fn new(context: Arc<dyn ContextStore>) -> Self {
        Self {
            context,
            catalog: MirrorCatalog::default(),
            source_path: None,
            region: String::new(),
            server_index: None,
        }
    }

    pub fn into_shared(self) -> SharedMirrorList {
        Arc::new(Mutex::new(self))
    }

    /// Loads the catalog from `path` and seeds the selection with the first
    /// region of the document.
    ///
    /// Any load after the first starts by clearing the previous catalog and
    /// selection, which is reported as a region and server-index change.
    pub fn load(&mut self, path: &Path) -> Vec<MirrorEvent> {
        let mut events = Vec::new();

        if self.source_path.is_some() {
            self.catalog = MirrorCatalog::default();
            self.region.clear();
            self.server_index = None;
            self.publish();
            events.push(MirrorEvent::RegionChanged(String::new()));
            events.push(MirrorEvent::ServerIndexChanged(None));
        }

        self.source_path = Some(path.to_path_buf());
        log::debug!("Mirror list source path: {}", path.display());

        let catalog = match MirrorCatalog::from_path(path) {
            Ok(catalog) => catalog,
            Err(err) => {
                log::error!("Failed to load mirror list: {}", err);
                events.push(MirrorEvent::LoadFailed(err.to_string()));
                return events;
            }
        };

        self.catalog = catalog;
        self.region = self.catalog.first_region().unwrap_or_default().to_string();
        self.server_index = self.default_index(&self.region);
        self.publish();

        events.push(MirrorEvent::Loaded);
        events
    }

    /// True once a load produced at least one region.
    pub fn is_loaded(&self) -> bool {
        !self.catalog.is_empty()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn catalog(&self) -> &MirrorCatalog {
        &self.catalog
    }

    /// Chooses `region` and resets the server to its first entry.
    ///
    /// Empty or unknown names are ignored and produce no events.
    pub fn set_selected_region(&mut self, region: &str) -> Vec<MirrorEvent> {
        if region.is_empty() || !self.catalog.contains_region(region) {
            return Vec::new();
        }

        self.region = region.to_string();
        self.server_index = self.default_index(region);
        self.publish();

        vec![
            MirrorEvent::RegionChanged(self.region.clone()),
            MirrorEvent::ServerIndexChanged(self.server_index),
        ]
    }

    /// Chooses a server of the current region by index, or clears the server
    /// choice with `None`.
    ///
    /// An index outside the current region's server list is rejected and
    /// produces no events.
    pub fn set_server_index(&mut self, index: Option<usize>) -> Vec<MirrorEvent> {
        if let Some(i) = index {
            let available = self.catalog.servers(&self.region).len();
            if i >= available {
                log::warn!(
                    "Ignoring server index {} for region {:?} ({} servers)",
                    i,
                    self.region,
                    available
                );
                return Vec::new();
            }
        }

        self.server_index = index;
        self.publish();

        vec![MirrorEvent::ServerIndexChanged(self.server_index)]
    }

    /// The selected region, or an empty string when no server is selected.
    pub fn selected_region(&self) -> &str {
        match self.selected_server() {
            Some(_) => &self.region,
            None => "",
        }
    }

    /// The region last chosen, even if it has no server to select.
    pub fn current_region(&self) -> &str {
        &self.region
    }

    pub fn server_index(&self) -> Option<usize> {
        self.server_index
    }

    pub fn selected_server(&self) -> Option<&MirrorServer> {
        if self.region.is_empty() {
            return None;
        }
        self.catalog.server(&self.region, self.server_index?)
    }

    /// Canonical URL of the selected server, or an empty string.
    pub fn selected_full_server(&self) -> &str {
        self.selected_server()
            .map(|server| server.canonical_url.as_str())
            .unwrap_or("")
    }

    pub fn region_names(&self) -> &[String] {
        self.catalog.region_names()
    }

    pub fn servers(&self, region: &str) -> &[MirrorServer] {
        self.catalog.servers(region)
    }

    pub fn server_pretty_urls(&self, region: &str) -> Vec<String> {
        self.servers(region)
            .iter()
            .map(|server| server.display_url.clone())
            .collect()
    }

    pub fn server_full_urls(&self, region: &str) -> Vec<String> {
        self.servers(region)
            .iter()
            .map(|server| server.canonical_url.clone())
            .collect()
    }

    fn default_index(&self, region: &str) -> Option<usize> {
        if self.catalog.servers(region).is_empty() {
            None
        } else {
            Some(0)
        }
    }

    fn publish(&self) {
        let (region, server) = match self.selected_server() {
            Some(server) => (self.region.clone(), server.canonical_url.clone()),
            None => (String::new(), String::new()),
        };
        self.context.insert_many(&[
            (MIRROR_REGION_KEY, Value::String(region)),
            (MIRROR_SERVER_KEY, Value::String(server)),
        ]);
    }
}

/// Locks a shared mirror list, recovering it if a previous holder panicked.
pub fn lock_shared(mirrors: &SharedMirrorList) -> MutexGuard<'_, MirrorList> {
    crate::context::lock(mirrors)
}
