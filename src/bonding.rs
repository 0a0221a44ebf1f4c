//! Key combinations bound to a target window.
//!
//! A [`KeyBonding`] holds a window handle, a set of modifier flags and an
//! ordered list of base keys. [`KeyBonding::press`] posts key-down messages
//! for all of them, [`KeyBonding::release`] posts the matching key-up
//! messages, and [`KeyBonding::launch`] does both.
//!
//! Modifiers are always applied in the fixed order
//! Alt, AltGraph, Shift, Control, RightShift, RightControl, followed by the
//! base keys in insertion order. Release uses the same order as press.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::{KeyError, Result};
use crate::key::Key;
use crate::process_finder::ProcessFinder;
use crate::vk::{self, VirtualKeyCode};
use crate::window::{KeyEvent, MessagePoster, NativeWindows, WindowHandle, WindowLocator};

/// A modifier flag of a [`KeyBonding`].
///
/// Serialized as its snake_case name. Deserialization goes through
/// [`FromStr`], so config files accept the same spellings as the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Alt,
    /// Sent as Alt followed by Control.
    AltGraph,
    Shift,
    Control,
    RightShift,
    RightControl,
}

impl Modifier {
    /// Every modifier, in application order.
    pub const ALL: [Modifier; 6] = [
        Modifier::Alt,
        Modifier::AltGraph,
        Modifier::Shift,
        Modifier::Control,
        Modifier::RightShift,
        Modifier::RightControl,
    ];

    /// Virtual keys posted for this modifier, in posting order.
    pub fn virtual_keys(self) -> &'static [VirtualKeyCode] {
        match self {
            Modifier::Alt => &[vk::ALT],
            Modifier::AltGraph => &[vk::ALT, vk::CTRL],
            Modifier::Shift => &[vk::SHIFT],
            Modifier::Control => &[vk::CTRL],
            Modifier::RightShift => &[vk::RSHIFT],
            Modifier::RightControl => &[vk::RCTRL],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Alt => "alt",
            Modifier::AltGraph => "alt_graph",
            Modifier::Shift => "shift",
            Modifier::Control => "control",
            Modifier::RightShift => "right_shift",
            Modifier::RightControl => "right_control",
        }
    }

    /// The flag for this modifier in a [`Modifiers`] set.
    pub const fn flag(self) -> Modifiers {
        match self {
            Modifier::Alt => Modifiers::ALT,
            Modifier::AltGraph => Modifiers::ALT_GRAPH,
            Modifier::Shift => Modifiers::SHIFT,
            Modifier::Control => Modifiers::CONTROL,
            Modifier::RightShift => Modifiers::RIGHT_SHIFT,
            Modifier::RightControl => Modifiers::RIGHT_CONTROL,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modifier {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_lowercase().replace('-', "_");
        let modifier = match name.as_str() {
            "alt" => Modifier::Alt,
            "alt_graph" | "altgraph" | "alt_gr" | "altgr" => Modifier::AltGraph,
            "shift" => Modifier::Shift,
            "control" | "ctrl" => Modifier::Control,
            "right_shift" | "rightshift" | "rshift" => Modifier::RightShift,
            "right_control" | "rightcontrol" | "right_ctrl" | "rctrl" => Modifier::RightControl,
            _ => return Err(KeyError::invalid_modifier(s)),
        };
        Ok(modifier)
    }
}

impl Serialize for Modifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Modifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}

bitflags::bitflags! {
    /// A set of [`Modifier`] flags. Flags are declared in application order.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const ALT = 1 << 0;
        const ALT_GRAPH = 1 << 1;
        const SHIFT = 1 << 2;
        const CONTROL = 1 << 3;
        const RIGHT_SHIFT = 1 << 4;
        const RIGHT_CONTROL = 1 << 5;
    }
}

impl Modifiers {
    /// The set modifiers, in application order.
    pub fn modifiers(self) -> impl Iterator<Item = Modifier> {
        Modifier::ALL
            .into_iter()
            .filter(move |modifier| self.contains(modifier.flag()))
    }
}

impl From<Modifier> for Modifiers {
    fn from(modifier: Modifier) -> Self {
        modifier.flag()
    }
}

/// A key that could not be resolved and was left out of a dispatch.
#[derive(Debug)]
pub struct SkippedKey {
    pub key: Key,
    pub event: KeyEvent,
    pub error: KeyError,
}

/// Outcome of [`KeyBonding::press`], [`KeyBonding::release`] or
/// [`KeyBonding::launch`].
///
/// Keys that fail to resolve do not fail the call; they are listed here.
#[derive(Debug, Default)]
pub struct Dispatch {
    /// Number of messages handed to the poster.
    pub posted: usize,
    pub skipped: Vec<SkippedKey>,
}

impl Dispatch {
    /// True when every configured key was posted.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn merge(&mut self, other: Dispatch) {
        self.posted += other.posted;
        self.skipped.extend(other.skipped);
    }
}

/// One key combination targeted at one window.
///
/// The bonding does nothing useful until a window is assigned, but it does
/// not refuse to run against the null handle either: messages are posted
/// and the OS drops them.
///
/// # Example
///
/// ```
/// use keybond::{KeyBonding, Modifier};
///
/// let mut bonding = KeyBonding::new();
/// bonding.add_modifier(Modifier::Control).add_key('s');
/// assert!(bonding.handle().is_null());
/// assert_eq!(bonding.keys().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct KeyBonding<P = NativeWindows> {
    handle: WindowHandle,
    modifiers: Modifiers,
    keys: Vec<Key>,
    poster: P,
}

impl KeyBonding<NativeWindows> {
    pub fn new() -> Self {
        Self::with_poster(NativeWindows)
    }
}

impl Default for KeyBonding<NativeWindows> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: MessagePoster> KeyBonding<P> {
    /// Creates an empty bonding that posts through `poster`.
    pub fn with_poster(poster: P) -> Self {
        Self {
            handle: WindowHandle::NULL,
            modifiers: Modifiers::empty(),
            keys: Vec::new(),
            poster,
        }
    }

    pub fn poster(&self) -> &P {
        &self.poster
    }

    pub fn handle(&self) -> WindowHandle {
        self.handle
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn assign_window(&mut self, handle: WindowHandle) -> &mut Self {
        debug!(window = %handle, "window assigned");
        self.handle = handle;
        self
    }

    /// Looks the window up by title and stores the result.
    ///
    /// A miss stores [`WindowHandle::NULL`] and is not an error; check the
    /// returned handle, or use [`KeyBonding::require_window_by_title`].
    pub fn assign_window_by_title<L: WindowLocator>(
        &mut self,
        locator: &L,
        title: &str,
    ) -> Result<WindowHandle> {
        let handle = locator.find_window(title)?;
        if handle.is_null() {
            debug!(title, "no window matched title");
        } else {
            info!(title, window = %handle, "window found");
        }
        self.handle = handle;
        Ok(handle)
    }

    /// Like [`KeyBonding::assign_window_by_title`], but a miss is
    /// [`KeyError::WindowNotFound`]. The null handle is still stored.
    pub fn require_window_by_title<L: WindowLocator>(
        &mut self,
        locator: &L,
        title: &str,
    ) -> Result<WindowHandle> {
        let handle = self.assign_window_by_title(locator, title)?;
        if handle.is_null() {
            return Err(KeyError::window_not_found(title));
        }
        Ok(handle)
    }

    /// Targets the first visible top-level window of a process whose name
    /// contains `process_name`.
    pub fn assign_window_by_process(
        &mut self,
        finder: &mut ProcessFinder,
        process_name: &str,
    ) -> Result<WindowHandle> {
        let handle = finder
            .find_process_window(process_name)?
            .ok_or_else(|| KeyError::process_not_found(process_name))?;
        info!(process = process_name, window = %handle, "window found");
        self.handle = handle;
        Ok(handle)
    }

    pub fn add_modifier(&mut self, modifier: Modifier) -> &mut Self {
        self.modifiers.insert(modifier.flag());
        self
    }

    pub fn set_modifier(&mut self, modifier: Modifier, enabled: bool) -> &mut Self {
        self.modifiers.set(modifier.flag(), enabled);
        self
    }

    pub fn add_key(&mut self, key: impl Into<Key>) -> &mut Self {
        self.keys.push(key.into());
        self
    }

    pub fn extend_keys<I>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        self.keys.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn clear_keys(&mut self) -> &mut Self {
        self.keys.clear();
        self
    }

    /// Posts key-down messages for every modifier and key.
    pub fn press(&self) -> Result<Dispatch> {
        self.send(KeyEvent::Down)
    }

    /// Posts key-up messages in the same order as [`KeyBonding::press`].
    pub fn release(&self) -> Result<Dispatch> {
        self.send(KeyEvent::Up)
    }

    /// Press followed immediately by release.
    ///
    /// If press fails, its error is returned and release is not attempted.
    pub fn launch(&self) -> Result<Dispatch> {
        let mut dispatch = self.press()?;
        dispatch.merge(self.release()?);
        Ok(dispatch)
    }

    fn send(&self, event: KeyEvent) -> Result<Dispatch> {
        let mut dispatch = Dispatch::default();

        for modifier in self.modifiers.modifiers() {
            for &code in modifier.virtual_keys() {
                self.post(event, code)?;
                dispatch.posted += 1;
            }
        }

        for key in &self.keys {
            match key.code() {
                Ok(code) => {
                    self.post(event, code)?;
                    dispatch.posted += 1;
                }
                Err(error) => {
                    warn!(%key, ?event, "skipping key: {error}");
                    dispatch.skipped.push(SkippedKey {
                        key: *key,
                        event,
                        error,
                    });
                }
            }
        }

        Ok(dispatch)
    }

    fn post(&self, event: KeyEvent, code: VirtualKeyCode) -> Result<()> {
        debug!(window = %self.handle, ?event, code, "posting key message");
        self.poster.post(self.handle, event, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<(WindowHandle, KeyEvent, VirtualKeyCode)>>,
        fail_on: Option<KeyEvent>,
    }

    impl MessagePoster for Recorder {
        fn post(&self, window: WindowHandle, event: KeyEvent, code: VirtualKeyCode) -> Result<()> {
            if self.fail_on == Some(event) {
                return Err(KeyError::unsupported_platform("recorder refused"));
            }
            self.events.borrow_mut().push((window, event, code));
            Ok(())
        }
    }

    fn events(bonding: &KeyBonding<Recorder>) -> Vec<(KeyEvent, VirtualKeyCode)> {
        bonding
            .poster()
            .events
            .borrow()
            .iter()
            .map(|&(_, event, code)| (event, code))
            .collect()
    }

    #[test]
    fn test_modifier_order_is_fixed() {
        let mut bonding = KeyBonding::with_poster(Recorder::default());
        bonding
            .add_modifier(Modifier::RightControl)
            .add_modifier(Modifier::Shift)
            .add_modifier(Modifier::Alt)
            .add_key('x');

        bonding.press().unwrap();
        bonding.release().unwrap();

        use KeyEvent::{Down, Up};
        assert_eq!(
            events(&bonding),
            vec![
                (Down, vk::ALT),
                (Down, vk::SHIFT),
                (Down, vk::RCTRL),
                (Down, 0x58),
                (Up, vk::ALT),
                (Up, vk::SHIFT),
                (Up, vk::RCTRL),
                (Up, 0x58),
            ]
        );
    }

    #[test]
    fn test_alt_graph_posts_alt_then_control() {
        let mut bonding = KeyBonding::with_poster(Recorder::default());
        bonding.add_modifier(Modifier::AltGraph).add_key('q');

        let dispatch = bonding.press().unwrap();
        assert_eq!(dispatch.posted, 3);
        assert_eq!(
            events(&bonding),
            vec![
                (KeyEvent::Down, vk::ALT),
                (KeyEvent::Down, vk::CTRL),
                (KeyEvent::Down, 0x51),
            ]
        );
    }

    #[test]
    fn test_posts_target_assigned_window() {
        let mut bonding = KeyBonding::with_poster(Recorder::default());
        bonding.assign_window(WindowHandle::from_raw(0xBEEF)).add_key('a');
        bonding.press().unwrap();

        let recorded = bonding.poster().events.borrow();
        assert_eq!(recorded[0].0, WindowHandle::from_raw(0xBEEF));
    }

    #[test]
    fn test_launch_short_circuits_when_press_fails() {
        let recorder = Recorder {
            fail_on: Some(KeyEvent::Down),
            ..Recorder::default()
        };
        let mut bonding = KeyBonding::with_poster(recorder);
        bonding.add_key('a');

        assert!(bonding.launch().is_err());
        assert!(events(&bonding).is_empty());
    }

    #[test]
    fn test_launch_reports_release_failure() {
        let recorder = Recorder {
            fail_on: Some(KeyEvent::Up),
            ..Recorder::default()
        };
        let mut bonding = KeyBonding::with_poster(recorder);
        bonding.add_key('a');

        assert!(bonding.launch().is_err());
        assert_eq!(events(&bonding), vec![(KeyEvent::Down, 0x41)]);
    }

    #[test]
    fn test_modifier_toggling() {
        let mut bonding = KeyBonding::with_poster(Recorder::default());
        assert!(bonding.modifiers().is_empty());

        bonding
            .set_modifier(Modifier::Control, true)
            .add_modifier(Modifier::Alt);
        assert_eq!(bonding.modifiers(), Modifiers::ALT | Modifiers::CONTROL);
        assert_eq!(
            bonding.modifiers().modifiers().collect::<Vec<_>>(),
            vec![Modifier::Alt, Modifier::Control]
        );

        bonding.set_modifier(Modifier::Control, false);
        assert!(!bonding.modifiers().contains(Modifiers::CONTROL));
        assert!(bonding.modifiers().contains(Modifier::Alt.flag()));
    }

    #[test]
    fn test_flags_follow_application_order() {
        let declared: Vec<Modifiers> = Modifiers::all().iter().collect();
        let ordered: Vec<Modifiers> = Modifier::ALL.iter().map(|m| m.flag()).collect();
        assert_eq!(declared, ordered);
        assert_eq!(Modifiers::from(Modifier::RightShift), Modifiers::RIGHT_SHIFT);
    }

    #[test]
    fn test_modifier_names() {
        assert_eq!("ctrl".parse::<Modifier>().unwrap(), Modifier::Control);
        assert_eq!("AltGr".parse::<Modifier>().unwrap(), Modifier::AltGraph);
        assert_eq!("right-shift".parse::<Modifier>().unwrap(), Modifier::RightShift);
        assert_eq!("rctrl".parse::<Modifier>().unwrap(), Modifier::RightControl);
        assert!(matches!(
            "hyper".parse::<Modifier>(),
            Err(KeyError::InvalidModifier(_))
        ));

        let parsed: Vec<Modifier> =
            serde_json::from_str(r#"["alt_gr", "ctrl", "rshift", "shift"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                Modifier::AltGraph,
                Modifier::Control,
                Modifier::RightShift,
                Modifier::Shift
            ]
        );
        for modifier in Modifier::ALL {
            assert_eq!(modifier.as_str().parse::<Modifier>().unwrap(), modifier);
        }
    }

    #[test]
    fn test_json_accepts_command_line_spellings() {
        for name in ["Shift", "right-shift", "rightshift", "rightcontrol", "AltGr", " ctrl "] {
            let from_cli: Modifier = name.parse().unwrap();
            let from_json: Modifier = serde_json::from_value(serde_json::json!(name)).unwrap();
            assert_eq!(from_json, from_cli);
        }

        let err = serde_json::from_str::<Modifier>(r#""hyper""#).unwrap_err();
        assert!(err.to_string().contains("invalid modifier"));

        assert_eq!(
            serde_json::to_string(&[Modifier::AltGraph, Modifier::RightControl]).unwrap(),
            r#"["alt_graph","right_control"]"#
        );
    }
}
