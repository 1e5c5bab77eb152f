pub mod config;
pub mod entry;
pub mod inspect;
pub mod learn;

use anyhow::Context;
use skillsmith_core::config::Config;
use skillsmith_core::invocation::Invocation;
use std::path::Path;

/// Load the project config, failing with the config path in the message.
pub(crate) fn load_config(root: &Path) -> anyhow::Result<Config> {
    Config::load(root).with_context(|| {
        format!(
            "failed to load {}",
            skillsmith_core::paths::config_path(root).display()
        )
    })
}

/// Join positional words back into one invocation string and parse it.
pub(crate) fn parse_invocation(args: &[String]) -> anyhow::Result<Invocation> {
    Ok(Invocation::parse(&args.join(" "))?)
}
