use std::{env, path::Path};

#[path = "build/routes.rs"]
mod routes;
#[path = "build/utils.rs"]
mod utils;

/// Must match `routes::API_PREFIX`.
const API_PREFIX: &str = "/api";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=build");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("missing CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(&manifest_dir);
    let api_dir = manifest_path.join("src").join("routes").join("api");

    let files = utils::collect_rust_files(&api_dir);
    for file in &files {
        println!("cargo:rerun-if-changed={}", file.display());
    }

    let mut entries = Vec::new();
    for file in &files {
        entries.extend(routes::parse_routes_file(file, manifest_path, API_PREFIX));
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path).then(a.method.cmp(&b.method)));

    let out_dir = env::var("OUT_DIR").expect("missing OUT_DIR");
    routes::write_routes(Path::new(&out_dir), &entries);
}
