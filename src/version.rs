//! Build metadata shown by `--version`.

/// Long version text: the crate version, the commit it was built from, and
/// the toolchain that built it. clap prefixes the binary name.
pub fn long_version() -> String {
    let mut text = env!("CARGO_PKG_VERSION").to_string();

    if let Some(commit) = option_env!("AUTOGRADE_GIT_HASH") {
        text.push_str(&format!(" ({})", commit));
    }
    text.push_str(concat!("\nTarget: ", env!("AUTOGRADE_TARGET")));
    if let Some(rustc) = option_env!("AUTOGRADE_RUSTC_VERSION") {
        text.push_str(&format!("\nRustc: {}", rustc));
    }

    text
}
