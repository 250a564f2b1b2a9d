//! Display sleep-prevention assertion held for the process lifetime.

const REASON: &str = "StayAwake prevents display sleep";

/// Holds the power-management assertion. Acquired once at startup and
/// released exactly once when dropped at shutdown, independent of whether a
/// session is running.
pub struct SleepGuard {
    #[cfg(target_os = "macos")]
    assertion_id: Option<u32>,
}

impl SleepGuard {
    /// Request a display-sleep assertion. Failure is logged and non-fatal;
    /// the returned guard simply has nothing to release.
    pub fn acquire() -> Self {
        #[cfg(target_os = "macos")]
        {
            match macos::create_assertion(REASON) {
                Ok(id) => {
                    tracing::info!("display sleep prevented");
                    Self {
                        assertion_id: Some(id),
                    }
                }
                Err(err) => {
                    tracing::warn!("failed to prevent display sleep: {err}");
                    Self { assertion_id: None }
                }
            }
        }

        #[cfg(not(target_os = "macos"))]
        {
            Self {}
        }
    }
}

impl Drop for SleepGuard {
    fn drop(&mut self) {
        #[cfg(target_os = "macos")]
        if let Some(id) = self.assertion_id.take() {
            macos::release_assertion(id);
            tracing::info!("display sleep assertion released");
        }
    }
}

#[cfg(target_os = "macos")]
mod macos {
    use cocoa::base::nil;
    use cocoa::foundation::NSString;
    use std::ffi::c_void;

    const ASSERTION_LEVEL_ON: u32 = 255;
    const IO_RETURN_SUCCESS: i32 = 0;

    #[link(name = "IOKit", kind = "framework")]
    extern "C" {
        fn IOPMAssertionCreateWithName(
            assertion_type: *const c_void,
            level: u32,
            name: *const c_void,
            id: *mut u32,
        ) -> i32;
        fn IOPMAssertionRelease(id: u32) -> i32;
    }

    pub fn create_assertion(reason: &str) -> anyhow::Result<u32> {
        unsafe {
            // NSString is toll-free bridged to the CFString these calls take.
            let kind = NSString::alloc(nil).init_str("NoDisplaySleepAssertion");
            let name = NSString::alloc(nil).init_str(reason);
            let mut id: u32 = 0;
            let status = IOPMAssertionCreateWithName(
                kind as *const c_void,
                ASSERTION_LEVEL_ON,
                name as *const c_void,
                &mut id,
            );
            if status == IO_RETURN_SUCCESS {
                Ok(id)
            } else {
                anyhow::bail!("IOPMAssertionCreateWithName returned {status}")
            }
        }
    }

    pub fn release_assertion(id: u32) {
        unsafe {
            let _ = IOPMAssertionRelease(id);
        }
    }
}
