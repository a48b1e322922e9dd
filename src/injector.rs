//! Synthetic relative mouse movement.
//!
//! Windows builds go through `SendInput`. On every other host each move is
//! refused as unsupported.

use std::sync::Arc;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InjectError {
    #[error("mouse injection is not supported on this platform")]
    Unsupported,
    #[error("the system refused the mouse move: {0}")]
    Refused(String),
}

/// Moves the system cursor by a relative offset in device pixels.
///
/// Requires the process to be allowed to synthesize input. Failures are
/// terminal for the caller's run; implementations never retry.
pub trait InputInjector: Send + Sync {
    fn inject(&self, dx: i32, dy: i32) -> Result<(), InjectError>;
}

#[cfg(windows)]
pub struct SendInputInjector;

#[cfg(windows)]
impl InputInjector for SendInputInjector {
    fn inject(&self, dx: i32, dy: i32) -> Result<(), InjectError> {
        use windows::Win32::UI::Input::KeyboardAndMouse::{
            SendInput, INPUT, INPUT_0, INPUT_MOUSE, MOUSEEVENTF_MOVE, MOUSEINPUT,
        };

        let input = INPUT {
            r#type: INPUT_MOUSE,
            Anonymous: INPUT_0 {
                mi: MOUSEINPUT {
                    dx,
                    dy,
                    mouseData: 0,
                    dwFlags: MOUSEEVENTF_MOVE,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        };

        let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
        if sent == 0 {
            return Err(InjectError::Refused(std::io::Error::last_os_error().to_string()));
        }
        Ok(())
    }
}

#[cfg(any(test, not(windows)))]
pub struct UnsupportedInjector;

#[cfg(any(test, not(windows)))]
impl InputInjector for UnsupportedInjector {
    fn inject(&self, _dx: i32, _dy: i32) -> Result<(), InjectError> {
        Err(InjectError::Unsupported)
    }
}

#[cfg(windows)]
pub fn platform_injector() -> Arc<dyn InputInjector> {
    Arc::new(SendInputInjector)
}

#[cfg(not(windows))]
pub fn platform_injector() -> Arc<dyn InputInjector> {
    tracing::warn!("no mouse injection backend for this platform");
    Arc::new(UnsupportedInjector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_always_fails() {
        let inj = UnsupportedInjector;
        assert_eq!(inj.inject(1, 0), Err(InjectError::Unsupported));
        assert_eq!(inj.inject(-1, 0), Err(InjectError::Unsupported));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_platform_injector_refuses_off_windows() {
        let inj = platform_injector();
        assert_eq!(inj.inject(1, 0), Err(InjectError::Unsupported));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            InjectError::Refused("Access is denied.".into()).to_string(),
            "the system refused the mouse move: Access is denied."
        );
    }
}
