//! Input handling - key translation

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Key modifier flags
pub mod key_flags {
    pub const CONTROL: u32 = 0x1000_0000;
    pub const META: u32 = 0x2000_0000;
    pub const SPEC: u32 = 0x8000_0000;
}

/// Represents a key input with modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key(pub u32);

impl Key {
    pub const ENTER: Key = Key(key_flags::CONTROL | 'm' as u32);
    pub const TAB: Key = Key(key_flags::CONTROL | 'i' as u32);
    pub const ESCAPE: Key = Key(key_flags::CONTROL | '[' as u32);
    pub const BACKSPACE: Key = Key(0x7f);
    pub const HOME: Key = Key(key_flags::SPEC | 0x47);
    pub const UP: Key = Key(key_flags::SPEC | 0x48);
    pub const PAGE_UP: Key = Key(key_flags::SPEC | 0x49);
    pub const LEFT: Key = Key(key_flags::SPEC | 0x4b);
    pub const RIGHT: Key = Key(key_flags::SPEC | 0x4d);
    pub const END: Key = Key(key_flags::SPEC | 0x4f);
    pub const DOWN: Key = Key(key_flags::SPEC | 0x50);
    pub const PAGE_DOWN: Key = Key(key_flags::SPEC | 0x51);
    pub const DELETE: Key = Key(key_flags::SPEC | 0x53);

    /// Create a key from a character
    pub fn char(ch: char) -> Self {
        Key(ch as u32)
    }

    /// Create a control key (C-x)
    pub fn ctrl(ch: char) -> Self {
        Key(key_flags::CONTROL | ch.to_ascii_lowercase() as u32)
    }

    /// Create a meta key (M-x)
    pub fn meta(ch: char) -> Self {
        Key(key_flags::META | ch.to_ascii_lowercase() as u32)
    }

    /// Function key F1..F12
    pub fn function(n: u8) -> Self {
        Key::special(0x3a + n as u32)
    }

    /// Create a special key (function keys, etc.)
    pub fn special(code: u32) -> Self {
        Key(key_flags::SPEC | code)
    }

    /// Check if this is a control key
    pub fn is_ctrl(&self) -> bool {
        self.0 & key_flags::CONTROL != 0
    }

    /// Check if this is a meta key
    pub fn is_meta(&self) -> bool {
        self.0 & key_flags::META != 0
    }

    /// Check if this is a special key
    pub fn is_special(&self) -> bool {
        self.0 & key_flags::SPEC != 0
    }

    /// Get the base character (without modifiers)
    pub fn base_char(&self) -> Option<char> {
        if self.is_special() {
            return None;
        }
        char::from_u32(self.0 & 0x00FF_FFFF)
    }

    /// Check if this is a printable self-insert character
    pub fn is_self_insert(&self) -> bool {
        if self.0 & 0xF000_0000 != 0 {
            return false;
        }
        matches!(char::from_u32(self.0), Some(ch) if ch >= ' ' && ch != '\x7f')
    }

    /// Convert key to a human-readable string (e.g., "C-s", "F5")
    pub fn display_name(&self) -> String {
        let mut result = String::new();
        if self.is_meta() {
            result.push_str("M-");
        }
        if self.is_ctrl() {
            result.push_str("C-");
        }

        if self.is_special() {
            let code = self.0 & 0xFF;
            let name = match code {
                0x47 => "Home",
                0x48 => "Up",
                0x49 => "PageUp",
                0x4b => "Left",
                0x4d => "Right",
                0x4f => "End",
                0x50 => "Down",
                0x51 => "PageDown",
                0x53 => "Delete",
                n if (0x3b..=0x46).contains(&n) => {
                    return format!("{}F{}", result, n - 0x3a);
                }
                _ => return format!("{}special-0x{:02x}", result, code),
            };
            result.push_str(name);
            return result;
        }

        match self.0 & 0x00FF_FFFF {
            0x7f => result.push_str("Backspace"),
            0x20 => result.push_str("SPC"),
            base => match char::from_u32(base) {
                Some(ch) => result.push(ch),
                None => result.push_str(&format!("0x{:x}", base)),
            },
        }
        result
    }
}

/// Translate a crossterm KeyEvent to our Key representation
pub fn translate_key(event: KeyEvent) -> Option<Key> {
    let KeyEvent {
        code, modifiers, kind, ..
    } = event;

    // Only process key press events, ignore release and repeat
    // This is critical on Windows where crossterm sends all event types
    if kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);

    match code {
        KeyCode::Char(ch) => {
            if ctrl && alt {
                Some(Key(key_flags::META | key_flags::CONTROL | ch.to_ascii_lowercase() as u32))
            } else if ctrl {
                Some(Key::ctrl(ch))
            } else if alt {
                Some(Key::meta(ch))
            } else {
                Some(Key::char(ch))
            }
        }
        KeyCode::Enter => Some(Key::ENTER),
        KeyCode::Tab => Some(Key::TAB),
        KeyCode::Backspace => Some(Key::BACKSPACE),
        KeyCode::Delete => Some(Key::DELETE),
        KeyCode::Home => Some(Key::HOME),
        KeyCode::End => Some(Key::END),
        KeyCode::PageUp => Some(Key::PAGE_UP),
        KeyCode::PageDown => Some(Key::PAGE_DOWN),
        KeyCode::Up => Some(Key::UP),
        KeyCode::Down => Some(Key::DOWN),
        KeyCode::Left => Some(Key::LEFT),
        KeyCode::Right => Some(Key::RIGHT),
        KeyCode::F(n) => Some(Key::function(n)),
        KeyCode::Esc => Some(Key::ESCAPE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_translate_keys() {
        assert_eq!(
            translate_key(press(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(Key::ctrl('s'))
        );
        assert_eq!(
            translate_key(press(KeyCode::F(5), KeyModifiers::NONE)),
            Some(Key::function(5))
        );
        assert_eq!(
            translate_key(press(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Key::ENTER)
        );
        assert_eq!(
            translate_key(press(KeyCode::Char('x'), KeyModifiers::SHIFT)),
            Some(Key::char('x'))
        );
    }

    #[test]
    fn test_release_ignored() {
        let mut event = press(KeyCode::Char('a'), KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(translate_key(event), None);
    }

    #[test]
    fn test_self_insert() {
        assert!(Key::char('a').is_self_insert());
        assert!(Key::char('⇒').is_self_insert());
        assert!(!Key::ctrl('a').is_self_insert());
        assert!(!Key::BACKSPACE.is_self_insert());
        assert!(!Key::UP.is_self_insert());
        assert_eq!(Key::UP.base_char(), None);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Key::ctrl('s').display_name(), "C-s");
        assert_eq!(Key::function(5).display_name(), "F5");
        assert_eq!(Key::meta('x').display_name(), "M-x");
        assert_eq!(Key::PAGE_DOWN.display_name(), "PageDown");
        assert_eq!(Key::BACKSPACE.display_name(), "Backspace");
    }
}
