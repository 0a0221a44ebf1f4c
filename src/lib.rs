//! # keybond
//!
//! Posts synthetic key-down/key-up messages to a specific window.
//!
//! ## Features
//!
//! - Target a window by handle, by title, or by owning process name
//! - Modifier flags (Alt, AltGr, Shift, Control, right Shift, right Control)
//! - Character keys (`0-9`, `A-Z`) and raw virtual-key codes
//! - Unresolvable keys are skipped and reported instead of aborting
//! - JSON configuration file support
//!
//! ## Example
//!
//! ```no_run
//! use keybond::{KeyBonding, Modifier, NativeWindows};
//!
//! let mut bonding = KeyBonding::new();
//! bonding.add_modifier(Modifier::Shift).add_key('a');
//! bonding.assign_window_by_title(&NativeWindows, "Untitled - Notepad")?;
//!
//! let dispatch = bonding.launch()?;
//! assert!(dispatch.is_complete());
//! # Ok::<(), keybond::KeyError>(())
//! ```
//!
//! ## Configuration
//!
//! ```json
//! {
//!   "window_title": "Untitled - Notepad",
//!   "modifiers": ["control"],
//!   "keys": ["s"]
//! }
//! ```

pub mod bonding;
pub mod config;
pub mod error;
pub mod key;
pub mod process_finder;
pub mod vk;
pub mod window;

pub use bonding::{Dispatch, KeyBonding, Modifier, Modifiers, SkippedKey};
pub use config::{Config, Target};
pub use error::{KeyError, Result};
pub use key::{resolve_key_code, Key};
pub use process_finder::ProcessFinder;
pub use vk::VirtualKeyCode;
pub use window::{KeyEvent, MessagePoster, NativeWindows, WindowHandle, WindowLocator};
