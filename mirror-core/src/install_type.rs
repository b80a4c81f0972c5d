//! Online/offline install-type gate.
//!
//! Online installs fetch packages from a mirror, so switching to online is
//! only allowed while the connectivity probe reports internet access.
//! Otherwise the gate falls back to offline and hands back an [`Advisory`]
//! for the user.

use crate::context::{ContextStore, INSTALL_TYPE_KEY, UPDATE_MIRROR_LIST_KEY};
use crate::network::Connectivity;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallType {
    Online,
    #[default]
    Offline,
}

impl InstallType {
    pub fn is_online(self) -> bool {
        self == InstallType::Online
    }
}

impl fmt::Display for InstallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallType::Online => write!(f, "online"),
            InstallType::Offline => write!(f, "offline"),
        }
    }
}

/// User-facing message explaining why a request was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub title: String,
    pub message: String,
}

impl Advisory {
    pub fn no_internet() -> Self {
        Self {
            title: "No Internet".to_string(),
            message: "Looks like you are not connected to the internet, but the online \
                      installation requires internet connectivity. Please connect to a \
                      network with internet access, then rerun the installer."
                .to_string(),
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

pub struct InstallTypeGate {
    context: Arc<dyn ContextStore>,
    connectivity: Arc<dyn Connectivity>,
    install_type: InstallType,
    update_mirror_list: bool,
}

impl InstallTypeGate {
    pub fn new(context: Arc<dyn ContextStore>, connectivity: Arc<dyn Connectivity>) -> Self {
        Self {
            context,
            connectivity,
            install_type: InstallType::default(),
            update_mirror_list: false,
        }
    }

    pub fn install_type(&self) -> InstallType {
        self.install_type
    }

    pub fn update_mirror_list(&self) -> bool {
        self.update_mirror_list
    }

    /// Switches the install type.
    ///
    /// Returns an advisory when online was requested without connectivity;
    /// the gate is then offline.
    pub fn select(&mut self, install_type: InstallType) -> Option<Advisory> {
        if install_type.is_online() && !self.connectivity.has_internet() {
            log::warn!("Online install requested without internet; staying offline");
            self.install_type = InstallType::Offline;
            self.publish_install_type();
            return Some(Advisory::no_internet());
        }

        self.install_type = install_type;
        self.publish_install_type();
        log::info!("Install type: {}", self.install_type);
        None
    }

    /// Called each time the owning step becomes active.
    ///
    /// Republishes the current install type and takes the update-mirror-list
    /// flag from the context, where configuration or an earlier visit left it.
    pub fn activate(&mut self) {
        self.publish_install_type();
        self.update_mirror_list = self.context.get_bool(UPDATE_MIRROR_LIST_KEY);
    }

    pub fn set_update_mirror_list(&mut self, enabled: bool) {
        self.update_mirror_list = enabled;
        self.context
            .insert(UPDATE_MIRROR_LIST_KEY, Value::Bool(enabled));
    }

    fn publish_install_type(&self) {
        self.context
            .insert(INSTALL_TYPE_KEY, Value::Bool(self.install_type.is_online()));
    }
}
