//! Launch-time check for the input-simulation (accessibility) permission.

/// Outcome of the one-time permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionOutcome {
    /// Permission is available, or not required on this platform.
    Granted,
    /// The user chose to open the system settings pane; the app keeps
    /// running without the permission.
    SettingsOpened,
    /// The user chose to quit instead of granting the permission.
    QuitRequested,
}

/// Query the accessibility trust status, raising the system prompt when it
/// is missing. When denied, presents a blocking choice between opening the
/// Accessibility settings pane and quitting. There is no retry loop.
pub fn check_accessibility() -> PermissionOutcome {
    #[cfg(target_os = "macos")]
    {
        macos::check()
    }

    #[cfg(not(target_os = "macos"))]
    {
        PermissionOutcome::Granted
    }
}

#[cfg(target_os = "macos")]
mod macos {
    use super::PermissionOutcome;
    use cocoa::base::{id, nil, YES};
    use cocoa::foundation::NSString;
    use objc::{class, msg_send, sel, sel_impl};
    use std::ffi::c_void;

    const ACCESSIBILITY_PANE_URL: &str =
        "x-apple.systempreferences:com.apple.preference.security?Privacy_Accessibility";

    #[link(name = "ApplicationServices", kind = "framework")]
    extern "C" {
        fn AXIsProcessTrustedWithOptions(options: *const c_void) -> bool;
    }

    pub fn check() -> PermissionOutcome {
        unsafe {
            // NSDictionary { AXTrustedCheckOptionPrompt: true } asks the OS
            // to show its own grant prompt alongside the query.
            let key = NSString::alloc(nil).init_str("AXTrustedCheckOptionPrompt");
            let yes: id = msg_send![class!(NSNumber), numberWithBool: YES];
            let options: id =
                msg_send![class!(NSDictionary), dictionaryWithObject: yes forKey: key];

            if AXIsProcessTrustedWithOptions(options as *const c_void) {
                return PermissionOutcome::Granted;
            }
            tracing::warn!("accessibility permission not granted");
            prompt_for_permission()
        }
    }

    unsafe fn prompt_for_permission() -> PermissionOutcome {
        let alert: id = msg_send![class!(NSAlert), new];
        let title = NSString::alloc(nil).init_str("Accessibility Permissions Required");
        let body = NSString::alloc(nil)
            .init_str("Please enable accessibility permissions for StayAwake in System Settings.");
        let _: () = msg_send![alert, setMessageText: title];
        let _: () = msg_send![alert, setInformativeText: body];

        let open_title = NSString::alloc(nil).init_str("Open System Settings");
        let quit_title = NSString::alloc(nil).init_str("Quit");
        let _: () = msg_send![alert, addButtonWithTitle: open_title];
        let _: () = msg_send![alert, addButtonWithTitle: quit_title];

        // runModal: 1000 = first button, 1001 = second
        let response: i64 = msg_send![alert, runModal];
        if response == 1000 {
            open_accessibility_pane();
            PermissionOutcome::SettingsOpened
        } else {
            PermissionOutcome::QuitRequested
        }
    }

    unsafe fn open_accessibility_pane() {
        let url_str = NSString::alloc(nil).init_str(ACCESSIBILITY_PANE_URL);
        let url: id = msg_send![class!(NSURL), URLWithString: url_str];
        if url != nil {
            let workspace: id = msg_send![class!(NSWorkspace), sharedWorkspace];
            let _: bool = msg_send![workspace, openURL: url];
        }
    }
}
