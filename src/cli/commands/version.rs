//! Version information display

use crate::cli::args::{OutputFormat, VersionArgs};

/// Renders the version line for `format`.
#[must_use]
pub fn render(format: OutputFormat) -> String {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    match format {
        OutputFormat::Human => format!("{name} {version}"),
        OutputFormat::Json => serde_json::json!({
            "name": name,
            "version": version,
            "rust_version": env!("CARGO_PKG_RUST_VERSION"),
        })
        .to_string(),
    }
}

/// Print version information.
pub fn run(args: &VersionArgs) {
    println!("{}", render(args.format));
}
