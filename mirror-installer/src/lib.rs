use anyhow::{bail, Context, Result};
use clap::Parser;
use mirror_core::cli::{Cli, Command};
use mirror_core::config::InstallTypeConfig;
use mirror_core::context::{ContextStore, JsonFileContext, MemoryContext};
use mirror_core::install_type::InstallType;
use mirror_core::network::TcpConnectivity;
use mirror_core::selection::lock_shared;
use mirror_core::{MirrorCatalog, MirrorEvent};
use mirror_workflow::{InstallTypeStep, JobQueue};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    mirror_core::logging::init_with(cli.log_file.clone());

    let config = match &cli.config {
        Some(path) => InstallTypeConfig::load(path)?,
        None => InstallTypeConfig::default(),
    };

    match &cli.command {
        Command::Regions { mirrorlist } => {
            let catalog = load_catalog(mirrorlist.as_deref(), &config)?;
            for region in catalog.region_names() {
                println!("{}\t{}", region, catalog.servers(region).len());
            }
        }
        Command::Servers { mirrorlist, region } => {
            let catalog = load_catalog(mirrorlist.as_deref(), &config)?;
            if !catalog.contains_region(region) {
                bail!("Unknown region: {}", region);
            }
            for (idx, server) in catalog.servers(region).iter().enumerate() {
                println!("{}\t{}\t{}", idx, server.display_url, server.canonical_url);
            }
        }
        Command::Apply {
            mirrorlist,
            region,
            server,
            online,
            update_mirror_list,
            root,
            target_dir,
            target_file,
        } => {
            let mut config = config;
            if let Some(path) = mirrorlist {
                config.mirror_list_source_path = path.clone();
            }
            if let Some(file) = target_file {
                config.mirrorlist_file = file.clone();
            }
            config.update_mirror_list |= *update_mirror_list;
            config.validate()?;

            let target_dir = match (root, target_dir) {
                (Some(root), _) => Some(config.target_dir_under(root)),
                (None, Some(dir)) => Some(dir.clone()),
                (None, None) => None,
            };

            let file_context = match &cli.context {
                Some(path) => Some(Arc::new(JsonFileContext::open(path)?)),
                None => None,
            };
            let context: Arc<dyn ContextStore> = match &file_context {
                Some(ctx) => Arc::clone(ctx) as Arc<dyn ContextStore>,
                None => Arc::new(MemoryContext::new()),
            };

            let outcome = apply(
                context,
                config,
                target_dir,
                ApplyRequest {
                    region: region.clone(),
                    server: *server,
                    online: *online,
                },
                cli.dry_run,
            );

            if let Some(ctx) = &file_context {
                ctx.flush()?;
                log::info!("Installation context saved to {}", ctx.path().display());
            }
            outcome?;
        }
    }

    Ok(())
}

fn load_catalog(mirrorlist: Option<&Path>, config: &InstallTypeConfig) -> Result<MirrorCatalog> {
    let path = mirrorlist.unwrap_or(config.mirror_list_source_path.as_path());
    MirrorCatalog::from_path(path).context("Cannot list mirrors")
}

struct ApplyRequest {
    region: String,
    server: Option<usize>,
    online: bool,
}

/// Drives the install-type step through one interactive pass and then runs
/// the provisioning jobs it hands off.
fn apply(
    context: Arc<dyn ContextStore>,
    config: InstallTypeConfig,
    target_dir: Option<PathBuf>,
    request: ApplyRequest,
    dry_run: bool,
) -> Result<()> {
    let mut step = InstallTypeStep::new(context, Arc::new(TcpConnectivity::default()));
    step.set_configuration(config);
    if let Some(dir) = target_dir {
        step.set_target_dir(dir);
    }

    for event in step.on_activate() {
        if let MirrorEvent::LoadFailed(reason) = event {
            bail!("Mirror list unavailable: {}", reason);
        }
    }

    if request.online {
        if let Some(advisory) = step.select_install_type(InstallType::Online) {
            eprintln!("{}", advisory);
        }
    } else {
        step.select_install_type(InstallType::Offline);
    }

    if step.select_region(&request.region).is_empty() {
        bail!("Unknown region: {}", request.region);
    }
    if let Some(index) = request.server {
        if step.select_server(Some(index)).is_empty() {
            bail!(
                "Server index {} is out of range for region {}",
                index,
                request.region
            );
        }
    }

    {
        let mirrors = step.mirrors();
        let mirrors = lock_shared(&mirrors);
        log::info!(
            "Install type: {}, mirror: {} {}",
            step.install_type(),
            mirrors.selected_region(),
            mirrors.selected_full_server()
        );
        println!("install type: {}", step.install_type());
        println!("region: {}", mirrors.selected_region());
        println!("server: {}", mirrors.selected_full_server());
    }

    let jobs = step.create_jobs();
    let report = JobQueue::new(dry_run).run(&jobs);
    for name in &report.completed {
        println!("done: {}", name);
    }
    if let Some(failure) = report.failure {
        bail!("{} failed: {}", failure.job, failure.result);
    }
    Ok(())
}
