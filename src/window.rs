//! Window lookup and message posting.
//!
//! The OS boundary is two traits, [`WindowLocator`] and [`MessagePoster`], so
//! that [`KeyBonding`](crate::KeyBonding) can be driven by recording fakes
//! in tests. [`NativeWindows`] implements both on top of `user32`.

use std::fmt;

use crate::error::Result;
use crate::vk::VirtualKeyCode;

/// Message id of a key-down notification.
pub const WM_KEYDOWN: u32 = 0x0100;
/// Message id of a key-up notification.
pub const WM_KEYUP: u32 = 0x0101;

/// Opaque reference to a top-level window.
///
/// The zero value is the "no window" sentinel returned by failed lookups.
/// Posting to it is allowed and is silently dropped by the OS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WindowHandle(usize);

impl WindowHandle {
    pub const NULL: WindowHandle = WindowHandle(0);

    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> usize {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Direction of a synthetic key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    Down,
    Up,
}

impl KeyEvent {
    /// The window message carrying this event.
    pub const fn message(self) -> u32 {
        match self {
            KeyEvent::Down => WM_KEYDOWN,
            KeyEvent::Up => WM_KEYUP,
        }
    }
}

/// Maps a window title to a handle.
pub trait WindowLocator {
    /// Returns [`WindowHandle::NULL`] when no window matches. Errors are
    /// reserved for the lookup itself being impossible.
    fn find_window(&self, title: &str) -> Result<WindowHandle>;
}

/// Enqueues a key message on a window's message queue.
///
/// Posting is fire-and-forget: implementations must not wait for the
/// window to process the message, and delivery is not confirmed.
pub trait MessagePoster {
    fn post(&self, window: WindowHandle, event: KeyEvent, code: VirtualKeyCode) -> Result<()>;
}

impl<T: WindowLocator + ?Sized> WindowLocator for &T {
    fn find_window(&self, title: &str) -> Result<WindowHandle> {
        (**self).find_window(title)
    }
}

impl<T: MessagePoster + ?Sized> MessagePoster for &T {
    fn post(&self, window: WindowHandle, event: KeyEvent, code: VirtualKeyCode) -> Result<()> {
        (**self).post(window, event, code)
    }
}

/// The host's windowing API.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeWindows;

#[cfg(windows)]
mod native {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    use std::ptr;

    use winapi::shared::minwindef::{BOOL, DWORD, FALSE, LPARAM, TRUE, WPARAM};
    use winapi::shared::windef::HWND;
    use winapi::um::winuser::{
        EnumWindows, FindWindowW, GetWindowThreadProcessId, IsWindowVisible, PostMessageW,
    };

    use super::{KeyEvent, MessagePoster, NativeWindows, WindowHandle, WindowLocator};
    use crate::error::Result;
    use crate::vk::VirtualKeyCode;

    fn to_wide(s: &str) -> Vec<u16> {
        OsStr::new(s).encode_wide().chain(std::iter::once(0)).collect()
    }

    impl WindowLocator for NativeWindows {
        fn find_window(&self, title: &str) -> Result<WindowHandle> {
            let title = to_wide(title);
            // SAFETY: `title` is a NUL-terminated UTF-16 buffer that outlives the call.
            let hwnd = unsafe { FindWindowW(ptr::null(), title.as_ptr()) };
            Ok(WindowHandle::from_raw(hwnd as usize))
        }
    }

    impl MessagePoster for NativeWindows {
        fn post(&self, window: WindowHandle, event: KeyEvent, code: VirtualKeyCode) -> Result<()> {
            // SAFETY: PostMessageW accepts any handle value, including stale
            // or null ones, and only enqueues. The return value is ignored.
            unsafe {
                PostMessageW(
                    window.as_raw() as HWND,
                    event.message(),
                    code as WPARAM,
                    0,
                );
            }
            Ok(())
        }
    }

    struct PidSearch {
        pid: DWORD,
        found: HWND,
    }

    unsafe extern "system" fn match_pid(hwnd: HWND, lparam: LPARAM) -> BOOL {
        let search = &mut *(lparam as *mut PidSearch);
        let mut owner: DWORD = 0;
        GetWindowThreadProcessId(hwnd, &mut owner);
        if owner == search.pid && IsWindowVisible(hwnd) != 0 {
            search.found = hwnd;
            return FALSE;
        }
        TRUE
    }

    pub(crate) fn window_for_pid(pid: u32) -> Result<WindowHandle> {
        let mut search = PidSearch {
            pid,
            found: ptr::null_mut(),
        };
        // SAFETY: `search` lives for the whole enumeration and the callback
        // is the only user of the pointer. EnumWindows reports failure when
        // the callback stops early, so its return value is not an error.
        unsafe {
            EnumWindows(Some(match_pid), &mut search as *mut PidSearch as LPARAM);
        }
        Ok(WindowHandle::from_raw(search.found as usize))
    }
}

#[cfg(not(windows))]
mod native {
    use super::{KeyEvent, MessagePoster, NativeWindows, WindowHandle, WindowLocator};
    use crate::error::{KeyError, Result};
    use crate::vk::VirtualKeyCode;

    impl WindowLocator for NativeWindows {
        fn find_window(&self, _title: &str) -> Result<WindowHandle> {
            Err(KeyError::unsupported_platform("window lookup requires Windows"))
        }
    }

    impl MessagePoster for NativeWindows {
        fn post(&self, _window: WindowHandle, _event: KeyEvent, _code: VirtualKeyCode) -> Result<()> {
            Err(KeyError::unsupported_platform("message posting requires Windows"))
        }
    }

    pub(crate) fn window_for_pid(_pid: u32) -> Result<WindowHandle> {
        Err(KeyError::unsupported_platform("window enumeration requires Windows"))
    }
}

/// First visible top-level window owned by `pid`, or the null handle.
pub(crate) fn window_for_pid(pid: u32) -> Result<WindowHandle> {
    native::window_for_pid(pid)
}
