//! Accelerator string parsing.
//!
//! Accelerators arrive from the editing layer as display strings like
//! "Ctrl+Alt+1". A valid accelerator names at least one modifier and
//! exactly one key; anything else is rejected before it reaches the OS.

use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use thiserror::Error;

/// Errors produced when parsing a user-supplied accelerator string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccelError {
    #[error("accelerator is empty")]
    Empty,
    #[error("accelerator `{0}` has no modifier")]
    MissingModifier(String),
    #[error("accelerator `{0}` has no key")]
    MissingKey(String),
    #[error("accelerator `{accelerator}` names more than one key")]
    MultipleKeys { accelerator: String },
    #[error("unknown token `{token}` in accelerator `{accelerator}`")]
    UnknownToken { accelerator: String, token: String },
}

/// Parses an accelerator string into an OS-registrable hotkey.
pub fn parse_accelerator(raw: &str) -> Result<HotKey, AccelError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AccelError::Empty);
    }

    let mut modifiers = Modifiers::empty();
    let mut key: Option<Code> = None;

    for token in raw.split('+').map(str::trim) {
        let lowered = token.to_ascii_lowercase();
        match lowered.as_str() {
            "" => {
                return Err(AccelError::UnknownToken {
                    accelerator: raw.to_owned(),
                    token: token.to_owned(),
                });
            }
            "ctrl" | "control" => modifiers |= Modifiers::CONTROL,
            "alt" | "option" => modifiers |= Modifiers::ALT,
            "shift" => modifiers |= Modifiers::SHIFT,
            "cmd" | "command" | "meta" => modifiers |= Modifiers::META,
            "super" | "win" => modifiers |= Modifiers::SUPER,
            "cmdorctrl" | "commandorcontrol" => {
                #[cfg(target_os = "macos")]
                {
                    modifiers |= Modifiers::META;
                }
                #[cfg(not(target_os = "macos"))]
                {
                    modifiers |= Modifiers::CONTROL;
                }
            }
            _ => match parse_key(&lowered) {
                Some(code) if key.is_none() => key = Some(code),
                Some(_) => {
                    return Err(AccelError::MultipleKeys {
                        accelerator: raw.to_owned(),
                    });
                }
                None => {
                    return Err(AccelError::UnknownToken {
                        accelerator: raw.to_owned(),
                        token: token.to_owned(),
                    });
                }
            },
        }
    }

    if modifiers.is_empty() {
        return Err(AccelError::MissingModifier(raw.to_owned()));
    }
    let Some(key) = key else {
        return Err(AccelError::MissingKey(raw.to_owned()));
    };

    Ok(HotKey::new(Some(modifiers), key))
}

fn parse_key(token: &str) -> Option<Code> {
    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return single_char_key(c);
    }

    let code = match token {
        "f1" => Code::F1,
        "f2" => Code::F2,
        "f3" => Code::F3,
        "f4" => Code::F4,
        "f5" => Code::F5,
        "f6" => Code::F6,
        "f7" => Code::F7,
        "f8" => Code::F8,
        "f9" => Code::F9,
        "f10" => Code::F10,
        "f11" => Code::F11,
        "f12" => Code::F12,
        "space" => Code::Space,
        "enter" | "return" => Code::Enter,
        "tab" => Code::Tab,
        "escape" | "esc" => Code::Escape,
        "backspace" => Code::Backspace,
        "delete" | "del" => Code::Delete,
        "insert" => Code::Insert,
        "home" => Code::Home,
        "end" => Code::End,
        "pageup" => Code::PageUp,
        "pagedown" => Code::PageDown,
        "up" => Code::ArrowUp,
        "down" => Code::ArrowDown,
        "left" => Code::ArrowLeft,
        "right" => Code::ArrowRight,
        "minus" => Code::Minus,
        "equal" => Code::Equal,
        "comma" => Code::Comma,
        "period" => Code::Period,
        "slash" => Code::Slash,
        "backslash" => Code::Backslash,
        "semicolon" => Code::Semicolon,
        "quote" => Code::Quote,
        "backquote" => Code::Backquote,
        _ => return None,
    };
    Some(code)
}

fn single_char_key(c: char) -> Option<Code> {
    let code = match c.to_ascii_lowercase() {
        'a' => Code::KeyA,
        'b' => Code::KeyB,
        'c' => Code::KeyC,
        'd' => Code::KeyD,
        'e' => Code::KeyE,
        'f' => Code::KeyF,
        'g' => Code::KeyG,
        'h' => Code::KeyH,
        'i' => Code::KeyI,
        'j' => Code::KeyJ,
        'k' => Code::KeyK,
        'l' => Code::KeyL,
        'm' => Code::KeyM,
        'n' => Code::KeyN,
        'o' => Code::KeyO,
        'p' => Code::KeyP,
        'q' => Code::KeyQ,
        'r' => Code::KeyR,
        's' => Code::KeyS,
        't' => Code::KeyT,
        'u' => Code::KeyU,
        'v' => Code::KeyV,
        'w' => Code::KeyW,
        'x' => Code::KeyX,
        'y' => Code::KeyY,
        'z' => Code::KeyZ,
        '0' => Code::Digit0,
        '1' => Code::Digit1,
        '2' => Code::Digit2,
        '3' => Code::Digit3,
        '4' => Code::Digit4,
        '5' => Code::Digit5,
        '6' => Code::Digit6,
        '7' => Code::Digit7,
        '8' => Code::Digit8,
        '9' => Code::Digit9,
        '-' => Code::Minus,
        '=' => Code::Equal,
        ',' => Code::Comma,
        '.' => Code::Period,
        '/' => Code::Slash,
        '\\' => Code::Backslash,
        ';' => Code::Semicolon,
        '\'' => Code::Quote,
        '`' => Code::Backquote,
        '[' => Code::BracketLeft,
        ']' => Code::BracketRight,
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modifier_and_digit() {
        let hotkey = parse_accelerator("Ctrl+Alt+1").unwrap();
        assert_eq!(
            hotkey,
            HotKey::new(Some(Modifiers::CONTROL | Modifiers::ALT), Code::Digit1)
        );
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!(
            parse_accelerator("ctrl+alt+1"),
            parse_accelerator("CTRL+ALT+1")
        );
    }

    #[test]
    fn parses_named_keys() {
        let hotkey = parse_accelerator("Shift+Meta+Space").unwrap();
        assert_eq!(
            hotkey,
            HotKey::new(Some(Modifiers::SHIFT | Modifiers::META), Code::Space)
        );
        assert!(parse_accelerator("Ctrl+F5").is_ok());
        assert!(parse_accelerator("Ctrl+Up").is_ok());
    }

    #[test]
    fn cmd_or_ctrl_resolves_per_platform() {
        let hotkey = parse_accelerator("CmdOrCtrl+K").unwrap();
        #[cfg(target_os = "macos")]
        assert_eq!(hotkey, HotKey::new(Some(Modifiers::META), Code::KeyK));
        #[cfg(not(target_os = "macos"))]
        assert_eq!(hotkey, HotKey::new(Some(Modifiers::CONTROL), Code::KeyK));
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(parse_accelerator(""), Err(AccelError::Empty));
        assert_eq!(parse_accelerator("   "), Err(AccelError::Empty));
    }

    #[test]
    fn rejects_bare_key() {
        assert_eq!(
            parse_accelerator("K"),
            Err(AccelError::MissingModifier("K".to_owned()))
        );
    }

    #[test]
    fn rejects_modifiers_without_key() {
        assert_eq!(
            parse_accelerator("Ctrl+Shift"),
            Err(AccelError::MissingKey("Ctrl+Shift".to_owned()))
        );
    }

    #[test]
    fn rejects_trailing_combinator() {
        assert!(matches!(
            parse_accelerator("Ctrl+"),
            Err(AccelError::UnknownToken { .. })
        ));
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert_eq!(
            parse_accelerator("Ctrl+NotAKey"),
            Err(AccelError::UnknownToken {
                accelerator: "Ctrl+NotAKey".to_owned(),
                token: "NotAKey".to_owned(),
            })
        );
    }

    #[test]
    fn rejects_two_keys() {
        assert_eq!(
            parse_accelerator("Ctrl+A+B"),
            Err(AccelError::MultipleKeys {
                accelerator: "Ctrl+A+B".to_owned()
            })
        );
    }
}
