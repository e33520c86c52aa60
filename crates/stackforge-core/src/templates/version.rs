//! Version comparison for CLI and template pack compatibility

use semver::Version;

/// Compare the CLI version against a template pack version.
/// Returns a warning message if the CLI is older than the pack expects.
pub fn check_compatibility(cli_version: &str, template_version: &str) -> Option<String> {
    let cli_ver = Version::parse(cli_version).ok()?;
    let template_ver = Version::parse(template_version.trim_start_matches('v')).ok()?;

    if cli_ver < template_ver {
        Some(format!(
            "These templates were written for stackforge {} or newer, \
             you are running {}. Generated output may reference context the CLI does not provide.",
            template_version, cli_version
        ))
    } else {
        None
    }
}
