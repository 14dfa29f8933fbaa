//! Build information for the `version` command.

/// Release version of the binary.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Git commit the binary was built from, `dev` for local builds.
pub fn git_sha() -> &'static str {
    option_env!("STACKWATCH_GIT_SHA").unwrap_or("dev")
}
