use std::{
    fs,
    path::{Path, PathBuf},
};

/// Quotes `value` as a Rust string literal body.
pub(crate) fn escape_rust_string(value: &str) -> String {
    value.chars().fold(String::with_capacity(value.len()), |mut out, ch| {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
        out
    })
}

pub(crate) fn parse_rust_file(path: &Path) -> syn::File {
    let source = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("cannot read route module {}: {err}", path.display()));
    syn::parse_file(&source)
        .unwrap_or_else(|err| panic!("route module {} does not parse: {err}", path.display()))
}

/// Route modules under `dir`, sorted so the generated table is stable.
pub(crate) fn collect_rust_files(dir: &Path) -> Vec<PathBuf> {
    let mut pending = vec![dir.to_path_buf()];
    let mut files = Vec::new();
    while let Some(current) = pending.pop() {
        let listing = fs::read_dir(&current)
            .unwrap_or_else(|err| panic!("cannot list {}: {err}", current.display()));
        for path in listing.filter_map(Result::ok).map(|entry| entry.path()) {
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}
