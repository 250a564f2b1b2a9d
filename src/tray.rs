//! Status-bar icon and menu.

use tray_icon::menu::{Menu, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

/// Menu action selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    ToggleStartStop,
    OpenSettings,
    Quit,
}

pub struct Tray {
    _icon: TrayIcon,
    start_stop: MenuItem,
    start_stop_id: MenuId,
    settings_id: MenuId,
    quit_id: MenuId,
}

impl Tray {
    /// Build the status item and its menu. Must run on the main thread with
    /// the event loop already live.
    pub fn build(initial_label: &str) -> anyhow::Result<Self> {
        let start_stop = MenuItem::new(initial_label, true, None);
        let settings = MenuItem::new("Settings…", true, None);
        let quit = MenuItem::new("Quit", true, None);

        let menu = Menu::new();
        menu.append(&start_stop)?;
        menu.append(&PredefinedMenuItem::separator())?;
        menu.append(&settings)?;
        menu.append(&PredefinedMenuItem::separator())?;
        menu.append(&quit)?;

        let icon = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_tooltip("StayAwake")
            .with_icon(build_icon())
            .build()?;

        Ok(Self {
            start_stop_id: start_stop.id().clone(),
            settings_id: settings.id().clone(),
            quit_id: quit.id().clone(),
            start_stop,
            _icon: icon,
        })
    }

    pub fn action_for(&self, id: &MenuId) -> Option<TrayAction> {
        if *id == self.start_stop_id {
            Some(TrayAction::ToggleStartStop)
        } else if *id == self.settings_id {
            Some(TrayAction::OpenSettings)
        } else if *id == self.quit_id {
            Some(TrayAction::Quit)
        } else {
            None
        }
    }

    /// Rewrite the Start/Stop item text to match the session state.
    pub fn set_label(&self, label: &str) {
        self.start_stop.set_text(label);
    }
}

fn build_icon() -> Icon {
    let (width, height) = (18usize, 18usize);
    let mut rgba = Vec::with_capacity(width * height * 4);
    let center = (width as f64 - 1.0) / 2.0;
    let radius = center - 1.0;

    for y in 0..height {
        for x in 0..width {
            let dx = x as f64 - center;
            let dy = y as f64 - center;
            let d = (dx * dx + dy * dy).sqrt();
            // Filled disc with a hollow core, roughly an eye from afar.
            let alpha = if d <= radius && d > radius * 0.45 {
                255
            } else {
                0
            };
            rgba.extend_from_slice(&[40, 40, 40, alpha]);
        }
    }

    Icon::from_rgba(rgba, width as u32, height as u32).expect("valid tray icon")
}
