//! Windows virtual-key codes.
//!
//! The values are the host OS's ABI constants and must not change. Digits
//! `0x30..=0x39` and letters `0x41..=0x5A` coincide with their ASCII codes
//! and have no named constant; see [`crate::key::resolve_key_code`].

/// A platform virtual-key code, sized like the `WPARAM` it travels in.
pub type VirtualKeyCode = usize;

pub const LBUTTON: VirtualKeyCode = 0x01;
pub const RBUTTON: VirtualKeyCode = 0x02;
pub const CANCEL: VirtualKeyCode = 0x03;
pub const MBUTTON: VirtualKeyCode = 0x04;
pub const XBUTTON1: VirtualKeyCode = 0x05;
pub const XBUTTON2: VirtualKeyCode = 0x06;
pub const BACK: VirtualKeyCode = 0x08;
pub const TAB: VirtualKeyCode = 0x09;
pub const CLEAR: VirtualKeyCode = 0x0C;
pub const RETURN: VirtualKeyCode = 0x0D;
pub const SHIFT: VirtualKeyCode = 0x10;
pub const CONTROL: VirtualKeyCode = 0x11;
pub const CTRL: VirtualKeyCode = CONTROL;
pub const MENU: VirtualKeyCode = 0x12;
pub const ALT: VirtualKeyCode = MENU;
pub const PAUSE: VirtualKeyCode = 0x13;
pub const CAPITAL: VirtualKeyCode = 0x14;
pub const KANA: VirtualKeyCode = 0x15;
pub const HANGUEL: VirtualKeyCode = KANA;
pub const HANGUL: VirtualKeyCode = KANA;
pub const JUNJA: VirtualKeyCode = 0x17;
pub const FINAL: VirtualKeyCode = 0x18;
pub const HANJA: VirtualKeyCode = 0x19;
pub const KANJI: VirtualKeyCode = HANJA;
pub const ESCAPE: VirtualKeyCode = 0x1B;
pub const CONVERT: VirtualKeyCode = 0x1C;
pub const NONCONVERT: VirtualKeyCode = 0x1D;
pub const ACCEPT: VirtualKeyCode = 0x1E;
pub const MODECHANGE: VirtualKeyCode = 0x1F;
pub const SPACE: VirtualKeyCode = 0x20;
pub const PRIOR: VirtualKeyCode = 0x21;
pub const NEXT: VirtualKeyCode = 0x22;
pub const END: VirtualKeyCode = 0x23;
pub const HOME: VirtualKeyCode = 0x24;
pub const LEFT: VirtualKeyCode = 0x25;
pub const UP: VirtualKeyCode = 0x26;
pub const RIGHT: VirtualKeyCode = 0x27;
pub const DOWN: VirtualKeyCode = 0x28;
pub const SELECT: VirtualKeyCode = 0x29;
pub const PRINT: VirtualKeyCode = 0x2A;
pub const EXECUTE: VirtualKeyCode = 0x2B;
pub const SNAPSHOT: VirtualKeyCode = 0x2C;
pub const INSERT: VirtualKeyCode = 0x2D;
pub const DELETE: VirtualKeyCode = 0x2E;
pub const HELP: VirtualKeyCode = 0x2F;
pub const LWIN: VirtualKeyCode = 0x5B;
pub const RWIN: VirtualKeyCode = 0x5C;
pub const APPS: VirtualKeyCode = 0x5D;
pub const SLEEP: VirtualKeyCode = 0x5F;
pub const NUMPAD0: VirtualKeyCode = 0x60;
pub const NUMPAD1: VirtualKeyCode = 0x61;
pub const NUMPAD2: VirtualKeyCode = 0x62;
pub const NUMPAD3: VirtualKeyCode = 0x63;
pub const NUMPAD4: VirtualKeyCode = 0x64;
pub const NUMPAD5: VirtualKeyCode = 0x65;
pub const NUMPAD6: VirtualKeyCode = 0x66;
pub const NUMPAD7: VirtualKeyCode = 0x67;
pub const NUMPAD8: VirtualKeyCode = 0x68;
pub const NUMPAD9: VirtualKeyCode = 0x69;
pub const MULTIPLY: VirtualKeyCode = 0x6A;
pub const ADD: VirtualKeyCode = 0x6B;
pub const SEPARATOR: VirtualKeyCode = 0x6C;
pub const SUBTRACT: VirtualKeyCode = 0x6D;
pub const DECIMAL: VirtualKeyCode = 0x6E;
pub const DIVIDE: VirtualKeyCode = 0x6F;
pub const F1: VirtualKeyCode = 0x70;
pub const F2: VirtualKeyCode = 0x71;
pub const F3: VirtualKeyCode = 0x72;
pub const F4: VirtualKeyCode = 0x73;
pub const F5: VirtualKeyCode = 0x74;
pub const F6: VirtualKeyCode = 0x75;
pub const F7: VirtualKeyCode = 0x76;
pub const F8: VirtualKeyCode = 0x77;
pub const F9: VirtualKeyCode = 0x78;
pub const F10: VirtualKeyCode = 0x79;
pub const F11: VirtualKeyCode = 0x7A;
pub const F12: VirtualKeyCode = 0x7B;
pub const F13: VirtualKeyCode = 0x7C;
pub const F14: VirtualKeyCode = 0x7D;
pub const F15: VirtualKeyCode = 0x7E;
pub const F16: VirtualKeyCode = 0x7F;
pub const F17: VirtualKeyCode = 0x80;
pub const F18: VirtualKeyCode = 0x81;
pub const F19: VirtualKeyCode = 0x82;
pub const F20: VirtualKeyCode = 0x83;
pub const F21: VirtualKeyCode = 0x84;
pub const F22: VirtualKeyCode = 0x85;
pub const F23: VirtualKeyCode = 0x86;
pub const F24: VirtualKeyCode = 0x87;
pub const NUMLOCK: VirtualKeyCode = 0x90;
pub const SCROLL: VirtualKeyCode = 0x91;
// Left/right variants are only distinguished by GetAsyncKeyState and
// GetKeyState; window messages carry them as-is.
pub const LSHIFT: VirtualKeyCode = 0xA0;
pub const RSHIFT: VirtualKeyCode = 0xA1;
pub const LCONTROL: VirtualKeyCode = 0xA2;
pub const LCTRL: VirtualKeyCode = LCONTROL;
pub const RCONTROL: VirtualKeyCode = 0xA3;
pub const RCTRL: VirtualKeyCode = RCONTROL;
pub const LMENU: VirtualKeyCode = 0xA4;
pub const RMENU: VirtualKeyCode = 0xA5;

/// Name → code table. The first entry for a code is its canonical name.
pub static NAMED_KEYS: &[(&str, VirtualKeyCode)] = &[
    ("lbutton", LBUTTON),
    ("rbutton", RBUTTON),
    ("cancel", CANCEL),
    ("mbutton", MBUTTON),
    ("xbutton1", XBUTTON1),
    ("xbutton2", XBUTTON2),
    ("back", BACK),
    ("backspace", BACK),
    ("tab", TAB),
    ("clear", CLEAR),
    ("return", RETURN),
    ("enter", RETURN),
    ("shift", SHIFT),
    ("control", CONTROL),
    ("ctrl", CTRL),
    ("menu", MENU),
    ("alt", ALT),
    ("pause", PAUSE),
    ("capital", CAPITAL),
    ("capslock", CAPITAL),
    ("kana", KANA),
    ("hanguel", HANGUEL),
    ("hangul", HANGUL),
    ("junja", JUNJA),
    ("final", FINAL),
    ("hanja", HANJA),
    ("kanji", KANJI),
    ("escape", ESCAPE),
    ("esc", ESCAPE),
    ("convert", CONVERT),
    ("nonconvert", NONCONVERT),
    ("accept", ACCEPT),
    ("modechange", MODECHANGE),
    ("space", SPACE),
    ("prior", PRIOR),
    ("pageup", PRIOR),
    ("next", NEXT),
    ("pagedown", NEXT),
    ("end", END),
    ("home", HOME),
    ("left", LEFT),
    ("up", UP),
    ("right", RIGHT),
    ("down", DOWN),
    ("select", SELECT),
    ("print", PRINT),
    ("execute", EXECUTE),
    ("snapshot", SNAPSHOT),
    ("printscreen", SNAPSHOT),
    ("insert", INSERT),
    ("delete", DELETE),
    ("help", HELP),
    ("lwin", LWIN),
    ("rwin", RWIN),
    ("apps", APPS),
    ("sleep", SLEEP),
    ("numpad0", NUMPAD0),
    ("numpad1", NUMPAD1),
    ("numpad2", NUMPAD2),
    ("numpad3", NUMPAD3),
    ("numpad4", NUMPAD4),
    ("numpad5", NUMPAD5),
    ("numpad6", NUMPAD6),
    ("numpad7", NUMPAD7),
    ("numpad8", NUMPAD8),
    ("numpad9", NUMPAD9),
    ("multiply", MULTIPLY),
    ("add", ADD),
    ("separator", SEPARATOR),
    ("subtract", SUBTRACT),
    ("decimal", DECIMAL),
    ("divide", DIVIDE),
    ("f1", F1),
    ("f2", F2),
    ("f3", F3),
    ("f4", F4),
    ("f5", F5),
    ("f6", F6),
    ("f7", F7),
    ("f8", F8),
    ("f9", F9),
    ("f10", F10),
    ("f11", F11),
    ("f12", F12),
    ("f13", F13),
    ("f14", F14),
    ("f15", F15),
    ("f16", F16),
    ("f17", F17),
    ("f18", F18),
    ("f19", F19),
    ("f20", F20),
    ("f21", F21),
    ("f22", F22),
    ("f23", F23),
    ("f24", F24),
    ("numlock", NUMLOCK),
    ("scroll", SCROLL),
    ("scrolllock", SCROLL),
    ("lshift", LSHIFT),
    ("rshift", RSHIFT),
    ("lcontrol", LCONTROL),
    ("lctrl", LCTRL),
    ("rcontrol", RCONTROL),
    ("rctrl", RCTRL),
    ("lmenu", LMENU),
    ("lalt", LMENU),
    ("rmenu", RMENU),
    ("ralt", RMENU),
];

/// Looks up a virtual-key code by name, ignoring ASCII case.
pub fn code_for_name(name: &str) -> Option<VirtualKeyCode> {
    NAMED_KEYS
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|&(_, code)| code)
}

/// Canonical name for a code, falling back to the character for digits and
/// letters.
pub fn name_for_code(code: VirtualKeyCode) -> Option<String> {
    if let Some(&(name, _)) = NAMED_KEYS.iter().find(|&&(_, c)| c == code) {
        return Some(name.to_string());
    }
    match u8::try_from(code) {
        Ok(byte @ (b'0'..=b'9' | b'A'..=b'Z')) => Some(char::from(byte).to_string()),
        _ => None,
    }
}
