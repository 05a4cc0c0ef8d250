//! CLI / template version compatibility

use semver::Version;

/// Compare the running CLI against the template's minimum version.
/// Returns a warning when the CLI is older; unparseable versions are ignored.
pub fn check_compatibility(
    cli_version: &str,
    min_cli_version: &str,
    upgrade_command: &str,
) -> Option<String> {
    let cli = parse_version(cli_version)?;
    let required = parse_version(min_cli_version)?;

    (cli < required).then(|| {
        format!(
            "This template expects CLI version {} or newer, you are running {}. Consider updating: {}",
            required, cli, upgrade_command
        )
    })
}

/// Parse a version string, tolerating a leading `v`
pub fn parse_version(version_str: &str) -> Option<Version> {
    let cleaned = version_str.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    Version::parse(cleaned).ok()
}
