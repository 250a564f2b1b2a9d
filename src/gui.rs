//! Settings window and the single event-dispatch loop.
//!
//! Everything that can happen to the app — timer fires, menu clicks, the
//! quit hotkey — arrives as an [`AppEvent`] on one channel and is applied to
//! the controller synchronously inside `update`, on the UI thread. The menu
//! label is re-synced after every event, so there is no observable instant
//! where label and state disagree.

use crate::hotkey::QuitKeyMonitor;
use crate::session::{SessionController, SessionState};
use crate::settings::{self, Settings};
use crate::timer::TimerService;
use crate::tray::{Tray, TrayAction};
use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use tray_icon::menu::{MenuEvent, MenuId};

pub enum AppEvent {
    Timer(crate::timer::TimerFired),
    Menu(MenuId),
    Quit,
}

pub struct StayAwakeApp {
    controller: SessionController,
    settings: Settings,
    settings_path: PathBuf,
    events: Receiver<AppEvent>,
    tray: Option<Tray>,
    tray_failed: bool,
    _quit_monitor: QuitKeyMonitor,
    quitting: bool,
}

impl StayAwakeApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, settings_path: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();
        let ctx = cc.egui_ctx.clone();

        // Producers hand events to the dispatch loop and wake the UI thread;
        // they never touch app state themselves.
        let timer_tx = tx.clone();
        let timer_ctx = ctx.clone();
        let timers = TimerService::spawn(move |fired| {
            if timer_tx.send(AppEvent::Timer(fired)).is_ok() {
                timer_ctx.request_repaint();
            }
        });

        let menu_tx = tx.clone();
        let menu_ctx = ctx.clone();
        MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
            if menu_tx.send(AppEvent::Menu(event.id)).is_ok() {
                menu_ctx.request_repaint();
            }
        }));

        let quit_monitor = QuitKeyMonitor::install(move || {
            if tx.send(AppEvent::Quit).is_ok() {
                ctx.request_repaint();
            }
        });

        let mut controller = SessionController::new(timers);
        // A session begins as soon as the app is up.
        controller.start(&settings);

        Self {
            controller,
            settings,
            settings_path,
            events: rx,
            tray: None,
            tray_failed: false,
            _quit_monitor: quit_monitor,
            quitting: false,
        }
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                AppEvent::Timer(fired) => self.controller.handle_timer(fired),
                AppEvent::Menu(id) => {
                    let action = self.tray.as_ref().and_then(|t| t.action_for(&id));
                    match action {
                        Some(TrayAction::ToggleStartStop) => {
                            self.controller.toggle(&self.settings)
                        }
                        Some(TrayAction::OpenSettings) => self.set_window_visible(ctx, true),
                        Some(TrayAction::Quit) => self.quit(ctx),
                        None => {}
                    }
                }
                AppEvent::Quit => self.quit(ctx),
            }
            self.sync_menu_label();
        }
    }

    fn sync_menu_label(&self) {
        if let Some(tray) = &self.tray {
            tray.set_label(self.controller.menu_label());
        }
    }

    fn quit(&mut self, ctx: &egui::Context) {
        self.controller.stop();
        self.quitting = true;
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    fn set_window_visible(&mut self, ctx: &egui::Context, visible: bool) {
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(visible));
        if visible {
            ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
        }
    }

    fn settings_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("StayAwake");
            ui.label(match self.controller.state() {
                SessionState::Running => "Session running",
                SessionState::Idle => "Idle",
            });
            ui.separator();

            ui.label("Move interval");
            let interval = ui.add(
                egui::Slider::new(
                    &mut self.settings.move_interval,
                    settings::MOVE_INTERVAL_MIN..=settings::MOVE_INTERVAL_MAX,
                )
                .step_by(settings::MOVE_INTERVAL_STEP)
                .suffix(" s"),
            );

            ui.label("Run duration");
            let duration = ui.add(
                egui::Slider::new(
                    &mut self.settings.run_duration,
                    settings::RUN_DURATION_MIN..=settings::RUN_DURATION_MAX,
                )
                .step_by(settings::RUN_DURATION_STEP)
                .custom_formatter(|v, _| format!("{:.0} min", v / 60.0)),
            );

            if interval.changed() || duration.changed() {
                self.settings.normalize();
                // Applies to the next started session; running timers keep
                // their schedule.
                if let Err(err) = self.settings.save(&self.settings_path) {
                    tracing::warn!("failed to save settings: {err}");
                }
            }
        });
    }
}

impl eframe::App for StayAwakeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.tray.is_none() && !self.tray_failed && !self.quitting {
            // The status item can only be created once the event loop is live.
            match Tray::build(self.controller.menu_label()) {
                Ok(tray) => self.tray = Some(tray),
                Err(err) => {
                    self.tray_failed = true;
                    tracing::error!("failed to create status item: {err}");
                }
            }
        }

        self.drain_events(ctx);

        if ctx.input(|i| i.viewport().close_requested()) && !self.quitting {
            // Closing the settings window hides it; the app lives in the
            // menu bar until Quit.
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.set_window_visible(ctx, false);
        }

        self.settings_panel(ctx);
    }
}
