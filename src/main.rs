#[cfg(target_os = "macos")]
fn main() -> anyhow::Result<()> {
    use eframe::egui;
    use stay_awake::gui::StayAwakeApp;
    use stay_awake::permissions::{self, PermissionOutcome};
    use stay_awake::settings::{self, Settings};
    use stay_awake::{cursor, logging, power};

    let settings_path = settings::config_path();
    let settings = Settings::load(&settings_path)?;
    logging::init(settings.debug_logging);

    if permissions::check_accessibility() == PermissionOutcome::QuitRequested {
        tracing::info!("accessibility permission declined; exiting");
        return Ok(());
    }

    // Held for the whole process, independent of session state.
    let sleep_guard = power::SleepGuard::acquire();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([340.0, 220.0])
            .with_min_inner_size([300.0, 180.0])
            .with_visible(false),
        ..Default::default()
    };

    let result = eframe::run_native(
        "StayAwake",
        native_options,
        Box::new(move |cc| Box::new(StayAwakeApp::new(cc, settings, settings_path))),
    );
    if let Err(err) = result {
        tracing::error!("ui loop failed: {err}");
    }

    drop(sleep_guard);
    cursor::restore_default();
    Ok(())
}

#[cfg(not(target_os = "macos"))]
fn main() {
    eprintln!("StayAwake is a macOS menu-bar application.");
}
