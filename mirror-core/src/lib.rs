//! Mirror selection core library.
//!
//! `mirror-core` holds the mirror-list catalog, the selection state that sits
//! on top of it, the installation-context store it publishes into and the
//! online/offline install-type gate. Job orchestration lives in
//! `mirror-workflow`; the binary lives in `mirror-installer`.

pub mod atomic;
pub mod cli;
pub mod config;
pub mod context;
pub mod errors;
pub mod events;
pub mod install_type;
pub mod logging;
pub mod mirrorlist;
pub mod network;
pub mod selection;

pub use context::{ContextStore, JsonFileContext, MemoryContext};
pub use events::MirrorEvent;
pub use install_type::{Advisory, InstallType, InstallTypeGate};
pub use mirrorlist::{MirrorCatalog, MirrorServer};
pub use selection::{MirrorList, SharedMirrorList};
