use std::env;
use std::path::PathBuf;

/// Generate `jobmatch.h` into `OUT_DIR`. A failure is reported as a cargo
/// warning so the library itself still builds.
fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    let (Ok(crate_dir), Ok(out_dir)) = (env::var("CARGO_MANIFEST_DIR"), env::var("OUT_DIR")) else {
        println!("cargo:warning=missing cargo build environment, skipping header");
        return;
    };

    let generated = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("JOBMATCH_H")
        .with_cpp_compat(true)
        .generate();

    match generated {
        Ok(bindings) => {
            let header = PathBuf::from(out_dir).join("jobmatch.h");
            bindings.write_to_file(&header);
        }
        Err(err) => println!("cargo:warning=could not generate jobmatch.h: {err}"),
    }
}
