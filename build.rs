use std::env;

fn main() {
    // Expose the crate version under a stable name for the CLI and user agent
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=DETOUR_VERSION={}", version);

    println!("cargo:rerun-if-changed=src/");
    println!("cargo:rerun-if-changed=Cargo.toml");
}
