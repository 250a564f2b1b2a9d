//! Synthetic cursor movement and the active-cursor glyph.

use rand::Rng;

/// Maximum magnitude of the random nudge offset, in points.
const JITTER: f64 = 2.5;

/// Independent uniform offset for each axis, within ±[`JITTER`].
pub fn jitter() -> (f64, f64) {
    let mut rng = rand::thread_rng();
    (
        rng.gen_range(-JITTER..=JITTER),
        rng.gen_range(-JITTER..=JITTER),
    )
}

/// Post one synthetic mouse-moved event at the current cursor position plus
/// a small random offset. Event posting is fire-and-forget toward the OS;
/// the error here only covers failing to build the event.
pub fn nudge() -> anyhow::Result<()> {
    #[cfg(not(target_os = "macos"))]
    {
        anyhow::bail!("cursor nudge is only supported on macOS");
    }

    #[cfg(target_os = "macos")]
    {
        let (dx, dy) = jitter();
        macos::post_move(dx, dy)
    }
}

/// Tracks whether the "active" pointing-hand glyph is currently pushed onto
/// the system cursor stack.
///
/// Push and pop are guarded by a single flag, so they stay balanced no matter
/// how start/stop calls interleave (including a start while already running).
#[derive(Debug, Default)]
pub struct GlyphStack {
    active: bool,
}

impl GlyphStack {
    pub fn new() -> Self {
        Self { active: false }
    }

    pub fn activate(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        #[cfg(target_os = "macos")]
        macos::push_pointing_hand();
    }

    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        #[cfg(target_os = "macos")]
        macos::pop_cursor();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Reset the arrow cursor. Called once during shutdown.
pub fn restore_default() {
    #[cfg(target_os = "macos")]
    macos::set_arrow();
}

#[cfg(target_os = "macos")]
mod macos {
    use cocoa::base::{id, nil};
    use objc::{class, msg_send, sel, sel_impl};
    use std::ffi::c_void;

    #[repr(C)]
    #[derive(Clone, Copy)]
    struct CGPoint {
        x: f64,
        y: f64,
    }

    type CGEventRef = *mut c_void;

    // kCGEventMouseMoved, kCGHIDEventTap, kCGMouseButtonLeft
    const EVENT_MOUSE_MOVED: u32 = 5;
    const HID_EVENT_TAP: u32 = 0;
    const MOUSE_BUTTON_LEFT: u32 = 0;

    #[link(name = "CoreGraphics", kind = "framework")]
    extern "C" {
        fn CGEventCreate(source: *const c_void) -> CGEventRef;
        fn CGEventCreateMouseEvent(
            source: *const c_void,
            mouse_type: u32,
            position: CGPoint,
            button: u32,
        ) -> CGEventRef;
        fn CGEventGetLocation(event: CGEventRef) -> CGPoint;
        fn CGEventPost(tap: u32, event: CGEventRef);
    }

    #[link(name = "CoreFoundation", kind = "framework")]
    extern "C" {
        fn CFRelease(obj: *const c_void);
    }

    pub fn post_move(dx: f64, dy: f64) -> anyhow::Result<()> {
        unsafe {
            // An empty event reports the current cursor location in the same
            // coordinate space the move event is posted in.
            let probe = CGEventCreate(std::ptr::null());
            if probe.is_null() {
                anyhow::bail!("CGEventCreate returned null");
            }
            let here = CGEventGetLocation(probe);
            CFRelease(probe as *const c_void);

            let target = CGPoint {
                x: here.x + dx,
                y: here.y + dy,
            };
            let event = CGEventCreateMouseEvent(
                std::ptr::null(),
                EVENT_MOUSE_MOVED,
                target,
                MOUSE_BUTTON_LEFT,
            );
            if event.is_null() {
                anyhow::bail!("CGEventCreateMouseEvent returned null");
            }
            CGEventPost(HID_EVENT_TAP, event);
            CFRelease(event as *const c_void);
        }
        Ok(())
    }

    pub fn push_pointing_hand() {
        unsafe {
            let cursor: id = msg_send![class!(NSCursor), pointingHandCursor];
            if cursor != nil {
                let _: () = msg_send![cursor, push];
            }
        }
    }

    pub fn pop_cursor() {
        unsafe {
            let _: () = msg_send![class!(NSCursor), pop];
        }
    }

    pub fn set_arrow() {
        unsafe {
            let cursor: id = msg_send![class!(NSCursor), arrowCursor];
            if cursor != nil {
                let _: () = msg_send![cursor, set];
            }
        }
    }
}
