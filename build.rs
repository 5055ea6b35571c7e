use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=FFMPEG_DIR");
    println!("cargo:rerun-if-env-changed=VCPKG_ROOT");

    // ffmpeg-next discovery is only fragile on Windows; everywhere else
    // pkg-config handles it.
    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "windows" || env::var_os("FFMPEG_DIR").is_some() {
        return;
    }

    if let Ok(vcpkg_root) = env::var("VCPKG_ROOT") {
        let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
        let ffmpeg_dir = PathBuf::from(&vcpkg_root).join("installed").join(&triplet);
        if ffmpeg_dir.exists() {
            println!(
                "cargo:warning=Found vcpkg FFmpeg at {}. Set FFMPEG_DIR={} to pin discovery.",
                ffmpeg_dir.display(),
                ffmpeg_dir.display(),
            );
        }
    } else {
        println!(
            "cargo:warning=FFMPEG_DIR is not set. Install FFmpeg via vcpkg and set VCPKG_ROOT + FFMPEG_DIR."
        );
    }
}
