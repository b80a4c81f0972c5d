use super::{MirrorCatalog, MirrorServer};

const HEADING_MARKER: &str = "##";
const SERVER_MARKER: &str = "#Server";
const SERVER_PREFIX: &str = "#Server =";

pub(super) fn parse(content: &str) -> MirrorCatalog {
    let mut catalog = MirrorCatalog::default();
    let mut list_started = false;
    let mut current_region: Option<String> = None;

    for line in content.lines().map(str::trim) {
        if !list_started {
            // Leading `##` comments end at the first blank line.
            if line.is_empty() {
                list_started = true;
            }
            continue;
        }

        if line.is_empty() {
            continue;
        }

        if line.starts_with(HEADING_MARKER) {
            let region = line.replace(HEADING_MARKER, "");
            let region = region.trim();
            if region.is_empty() {
                current_region = None;
                continue;
            }
            catalog.open_region(region);
            current_region = Some(region.to_string());
            continue;
        }

        if line.starts_with(SERVER_MARKER) {
            let Some(region) = current_region.as_deref() else {
                log::debug!("Ignoring server line outside of a region: {}", line);
                continue;
            };
            let canonical = line.strip_prefix(SERVER_PREFIX).unwrap_or(line).trim();
            if canonical.is_empty() {
                log::debug!("Ignoring server line without a url in region {}", region);
                continue;
            }
            catalog.push_server(region, MirrorServer::from_canonical(canonical));
        }
    }

    log::info!(
        "Mirror list: {} regions, {} server urls",
        catalog.region_names().len(),
        catalog.server_count()
    );
    catalog
}
