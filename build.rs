use std::path::PathBuf;

#[path = "src/types/mod.rs"]
mod types;

fn main() {
    let out_dir = match std::env::var("NOTIFIER_BINDINGS_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            println!("cargo:warning=NOTIFIER_BINDINGS_DIR not set; skipping Specta bindings");
            println!("cargo:rerun-if-env-changed=NOTIFIER_BINDINGS_DIR");
            return;
        }
    };

    if !out_dir.is_dir() {
        println!(
            "cargo:warning=Specta bindings output dir not found; skipping generation: {}",
            out_dir.display()
        );
        return;
    }

    let out_file = out_dir.join("bindings.ts");
    let out_file_str = out_file.to_string_lossy().into_owned();
    let ts_cfg =
        specta::ts::ExportConfiguration::default().bigint(specta::ts::BigIntExportBehavior::Number);
    match specta::export::ts_with_cfg(&out_file_str, &ts_cfg) {
        Ok(()) => {}
        Err(specta::ts::TsExportError::Io(io_err))
            if io_err.kind() == std::io::ErrorKind::PermissionDenied =>
        {
            println!(
                "cargo:warning=Specta bindings output not writable; skipping generation: {}",
                out_file.display()
            );
        }
        Err(err) => {
            println!(
                "cargo:warning=failed to export Specta bindings to {}: {err}",
                out_file.display()
            );
            std::process::exit(1);
        }
    }

    println!("cargo:rerun-if-env-changed=NOTIFIER_BINDINGS_DIR");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/types/mod.rs");
    println!("cargo:rerun-if-changed=src/types/task.rs");
    println!("cargo:rerun-if-changed=src/types/reminder.rs");
    println!("cargo:rerun-if-changed=src/types/breaker.rs");
}
