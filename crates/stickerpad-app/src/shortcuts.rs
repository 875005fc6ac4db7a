//! Keyboard shortcut registry and documentation.

use stickerpad_core::{EditorCommand, Thickness};

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
    pub command: EditorCommand,
}

impl Shortcut {
    pub fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
        command: EditorCommand,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
            command,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, key: &str, ctrl: bool, shift: bool) -> bool {
        self.key.eq_ignore_ascii_case(key) && self.ctrl == ctrl && self.shift == shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, "Undo", EditorCommand::Undo),
            Shortcut::new("Z", true, true, "Redo", EditorCommand::Redo),
            Shortcut::new("Y", true, false, "Redo", EditorCommand::Redo),
            Shortcut::new("D", false, false, "Draw mode", EditorCommand::SelectDraw),
            Shortcut::new("S", false, false, "Sticker mode", EditorCommand::EnterStickerMode),
            Shortcut::new(
                "1",
                false,
                false,
                "Thin marker",
                EditorCommand::SetThickness(Thickness::Thin),
            ),
            Shortcut::new(
                "2",
                false,
                false,
                "Thick marker",
                EditorCommand::SetThickness(Thickness::Thick),
            ),
            Shortcut::new("Delete", false, false, "Clear canvas", EditorCommand::Clear),
        ]
    }

    /// Command bound to `key` with the given modifiers.
    pub fn lookup(key: &str, ctrl: bool, shift: bool) -> Option<EditorCommand> {
        Self::all()
            .into_iter()
            .find(|s| s.matches(key, ctrl, shift))
            .map(|s| s.command)
    }

    /// Log all shortcuts.
    pub fn print_all() {
        log::info!("Keyboard shortcuts:");
        for shortcut in Self::all() {
            log::info!("  {:14} {}", shortcut.format(), shortcut.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let shortcut = Shortcut::new("Z", true, true, "Redo", EditorCommand::Redo);
        assert_eq!(shortcut.format(), "Ctrl+Shift+Z");
    }

    #[test]
    fn test_lookup_undo_redo() {
        assert_eq!(ShortcutRegistry::lookup("z", true, false), Some(EditorCommand::Undo));
        assert_eq!(ShortcutRegistry::lookup("Z", true, true), Some(EditorCommand::Redo));
        assert_eq!(ShortcutRegistry::lookup("y", true, false), Some(EditorCommand::Redo));
    }

    #[test]
    fn test_lookup_requires_exact_modifiers() {
        assert_eq!(ShortcutRegistry::lookup("z", false, false), None);
        assert_eq!(ShortcutRegistry::lookup("d", true, false), None);
        assert_eq!(ShortcutRegistry::lookup("d", false, false), Some(EditorCommand::SelectDraw));
    }

    #[test]
    fn test_lookup_thickness() {
        assert_eq!(
            ShortcutRegistry::lookup("2", false, false),
            Some(EditorCommand::SetThickness(Thickness::Thick))
        );
    }

    #[test]
    fn test_no_duplicate_bindings() {
        let all = ShortcutRegistry::all();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert!(
                    !(a.key == b.key && a.ctrl == b.ctrl && a.shift == b.shift),
                    "{} bound twice",
                    a.format()
                );
            }
        }
    }
}
