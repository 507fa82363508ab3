use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=DRESSUP_ROOT_HINT");

    let hint = env::var("DRESSUP_ROOT_HINT")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            env::var("CARGO_MANIFEST_DIR")
                .ok()
                .map(|dir| PathBuf::from(dir).join("demos").join("wardrobe"))
        });

    if let Some(candidate) = hint {
        let canonical = candidate.canonicalize().unwrap_or(candidate);

        println!(
            "cargo:rustc-env=DRESSUP_ROOT_HINT={}",
            canonical.display()
        );
    }
}
