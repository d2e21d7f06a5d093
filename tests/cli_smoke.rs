use std::path::PathBuf;

#[test]
fn cli_writes_gif() {
    let dir = PathBuf::from("target").join("cli_smoke");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    for (name, rgb) in [("f1.png", [255u8, 0, 0]), ("f2.png", [0, 0, 255])] {
        image::RgbImage::from_pixel(8, 8, image::Rgb(rgb))
            .save(dir.join(name))
            .unwrap();
    }

    let out_path = dir.join("out.gif");

    let exe = std::env::var_os("CARGO_BIN_EXE_flipbook")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "flipbook.exe"
            } else {
                "flipbook"
            });
            p
        });

    let dir_arg = dir.to_string_lossy().to_string();
    let out_arg = out_path.to_string_lossy().to_string();

    let status = std::process::Command::new(exe)
        .args([dir_arg.as_str(), "-o", out_arg.as_str(), "--fps", "10"])
        .status()
        .unwrap();

    assert!(status.success());
    assert!(out_path.exists());

    let bytes = std::fs::read(&out_path).unwrap();
    assert!(bytes.starts_with(b"GIF89a"));
}

#[test]
fn cli_rejects_conflicting_timing_flags() {
    let exe = std::env::var_os("CARGO_BIN_EXE_flipbook")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target/debug/flipbook"));

    let status = std::process::Command::new(exe)
        .args([".", "--fps", "10", "--duration", "100"])
        .stderr(std::process::Stdio::null())
        .status()
        .unwrap();

    assert!(!status.success());
}
