use std::env;
use std::path::PathBuf;

const FORWARDED_KEYS: &[&str] = &[
    "SCOREDL_MODE",
    "SCOREDL_TIMEOUT_MS",
    "SCOREDL_MAIN_CID",
    "SCOREDL_IPFS_GATEWAY",
];

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("missing CARGO_MANIFEST_DIR"));
    let env_path = manifest_dir.join(".env");
    let env_local_path = manifest_dir.join(".env.local");

    let _ = dotenvy::from_filename(&env_local_path);
    let _ = dotenvy::from_filename(&env_path);

    println!("cargo:rerun-if-changed={}", env_path.display());
    println!("cargo:rerun-if-changed={}", env_local_path.display());

    for key in FORWARDED_KEYS {
        println!("cargo:rerun-if-env-changed={key}");
        let Ok(value) = env::var(key) else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        validate(key, value);
        println!("cargo:rustc-env={key}={value}");
    }
}

fn validate(key: &str, value: &str) {
    match key {
        "SCOREDL_MODE" => {
            let known = ["in-page", "inpage", "window", "ext-window"];
            if !known.iter().any(|mode| mode.eq_ignore_ascii_case(value)) {
                panic!("{key}='{value}' is not one of {known:?}");
            }
        }
        "SCOREDL_TIMEOUT_MS" => {
            if value.parse::<u32>().map(|ms| ms == 0).unwrap_or(true) {
                panic!("{key}='{value}' must be a positive integer of milliseconds");
            }
        }
        "SCOREDL_IPFS_GATEWAY" => {
            if !value.starts_with("https://") && !value.starts_with("http://") {
                panic!("{key}='{value}' must be an http(s) url");
            }
        }
        _ => {}
    }
}
