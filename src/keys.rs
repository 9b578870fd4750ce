use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// ============================================================================
// KEY PARSING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

/// Parse a binding such as `"q"`, `"Space"` or `"Ctrl-c"`.
pub fn parse_key(key_str: &str) -> Option<KeyBinding> {
    let mut ctrl = false;
    let mut alt = false;
    let mut shift = false;
    let mut key_part = key_str;

    // A lone "-" is the minus key, not an empty modifier list.
    if key_str.len() > 1 {
        if let Some((mut modifiers, last)) = key_str.rsplit_once('-') {
            if last.is_empty() {
                modifiers = modifiers.strip_suffix('-').unwrap_or(modifiers);
            }
            for modifier in modifiers.split('-') {
                match modifier.to_lowercase().as_str() {
                    "ctrl" | "control" => ctrl = true,
                    "alt" => alt = true,
                    "shift" => shift = true,
                    _ => return None,
                }
            }
            key_part = if last.is_empty() { "-" } else { last };
        }
    }

    let key = match key_part {
        "Esc" | "esc" | "Escape" => KeyCode::Esc,
        "Enter" | "enter" | "Return" => KeyCode::Enter,
        "Space" | "space" => KeyCode::Char(' '),
        "Tab" => KeyCode::Tab,
        "Backspace" => KeyCode::Backspace,
        "Delete" | "Del" => KeyCode::Delete,
        "Insert" | "Ins" => KeyCode::Insert,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        f if f.len() > 1 && f.starts_with('F') => match f[1..].parse::<u8>() {
            Ok(n @ 1..=12) => KeyCode::F(n),
            _ => return None,
        },
        c => {
            let mut chars = c.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => KeyCode::Char(ch),
                _ => return None,
            }
        }
    };

    Some(KeyBinding {
        key,
        ctrl,
        alt,
        shift,
    })
}

pub fn matches_key(key: &KeyBinding, event: &KeyEvent) -> bool {
    if key.key != event.code {
        return false;
    }

    let modifiers = event.modifiers;
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);
    let shift = modifiers.contains(KeyModifiers::SHIFT);

    key.ctrl == ctrl && key.alt == alt && key.shift == shift
}

/// Parsed bindings for one action. Unparsable entries are logged and skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet(Vec<KeyBinding>);

impl KeySet {
    pub fn parse(names: &[String]) -> Self {
        let bindings = names
            .iter()
            .filter_map(|name| {
                let binding = parse_key(name);
                if binding.is_none() {
                    tracing::warn!(key = %name, "ignoring unknown key binding");
                }
                binding
            })
            .collect();
        Self(bindings)
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.0.iter().any(|binding| matches_key(binding, event))
    }
}
