//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    env_logger::init();
    log::info!("Starting StickerPad");

    let config = stickerpad_app::AppConfig::from_env();
    if let Err(e) = pollster::block_on(stickerpad_app::App::run(config)) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    eprintln!("Native feature not enabled. Use `cargo run --features native`");
    std::process::exit(1);
}
