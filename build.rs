fn main() {
    // Host builds only compile the library and its tests.
    if std::env::var_os("CARGO_FEATURE_FIRMWARE").is_none() {
        return;
    }

    println!("cargo:rustc-link-arg-bins=-Tlinkall.x");
    println!("cargo:rerun-if-changed=calendar-creds");
    let creds_lines = std::fs::read_to_string("calendar-creds")
        .expect("calendar-creds file is required for firmware builds, see calendar-creds.example");
    for line in creds_lines.lines() {
        let val_pair = line.trim_start().trim_end();
        if !val_pair.is_empty() && !val_pair.starts_with('#') {
            println!("cargo:rustc-env={val_pair}")
        }
    }
}
