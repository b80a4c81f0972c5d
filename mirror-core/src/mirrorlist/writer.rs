/// Comment block written above a single-entry mirror list.
pub const SINGLE_ENTRY_HEADER: &str = "\
##
## Arch Linux repository mirrorlist
## Mirror chosen during installation
##
";

/// Renders a mirror list holding one region with one server.
///
/// The output follows the layout the parser reads: comment header, one blank
/// line, then the region heading and its server line.
pub fn render_single(region: &str, canonical_url: &str) -> String {
    format!(
        "{}\n## {}\n#Server = {}\n",
        SINGLE_ENTRY_HEADER, region, canonical_url
    )
}
