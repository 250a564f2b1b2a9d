//! System-wide Esc key monitor that requests application quit.

/// Handle for the installed key monitor. Removing it happens on drop.
pub struct QuitKeyMonitor {
    #[cfg(target_os = "macos")]
    _monitor: macos::Monitor,
}

impl QuitKeyMonitor {
    /// Install a global key-down monitor that invokes `on_quit` when Esc is
    /// pressed anywhere. Observing global events requires the accessibility
    /// permission; without it the monitor simply never fires.
    pub fn install<F: Fn() + 'static>(on_quit: F) -> Self {
        #[cfg(target_os = "macos")]
        {
            Self {
                _monitor: macos::install(on_quit),
            }
        }

        #[cfg(not(target_os = "macos"))]
        {
            let _ = on_quit;
            Self {}
        }
    }
}

#[cfg(target_os = "macos")]
mod macos {
    use block::ConcreteBlock;
    use cocoa::base::{id, nil};
    use objc::{class, msg_send, sel, sel_impl};

    const KEY_DOWN_MASK: u64 = 1 << 10;
    const ESC_KEYCODE: u16 = 53;

    pub struct Monitor {
        handle: id,
    }

    pub fn install<F: Fn() + 'static>(on_quit: F) -> Monitor {
        let block = ConcreteBlock::new(move |event: id| {
            let keycode: u16 = unsafe { msg_send![event, keyCode] };
            if keycode == ESC_KEYCODE {
                on_quit();
            }
        })
        .copy();

        let handle: id = unsafe {
            msg_send![
                class!(NSEvent),
                addGlobalMonitorForEventsMatchingMask: KEY_DOWN_MASK
                handler: &*block
            ]
        };
        Monitor { handle }
    }

    impl Drop for Monitor {
        fn drop(&mut self) {
            if self.handle != nil {
                unsafe {
                    let _: () = msg_send![class!(NSEvent), removeMonitor: self.handle];
                }
            }
        }
    }
}
