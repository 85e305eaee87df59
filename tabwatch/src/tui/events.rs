//! Converting terminal input to viewer events.

use crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

/// Events the viewer loop reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The `w` key: toggle wrap mode.
    ToggleWrap,
    /// A primary mouse click at a screen position.
    Click { x: u16, y: u16 },
    ScrollUp(usize),
    ScrollDown(usize),
    PageUp,
    PageDown,
    Home,
    End,
    /// Terminal resize to the given dimensions.
    Resize { width: u16, height: u16 },
    Quit,
}

/// Convert a crossterm event to a viewer event, if it maps to one.
pub fn convert_event(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) => {
            // Only key presses, not release or repeat.
            if key.kind != KeyEventKind::Press {
                return None;
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Some(Event::Quit);
            }
            if !key.modifiers.is_empty() {
                return None;
            }
            match key.code {
                KeyCode::Char('w') => Some(Event::ToggleWrap),
                KeyCode::Char('q') | KeyCode::Esc => Some(Event::Quit),
                KeyCode::Up => Some(Event::ScrollUp(1)),
                KeyCode::Down => Some(Event::ScrollDown(1)),
                KeyCode::PageUp => Some(Event::PageUp),
                KeyCode::PageDown => Some(Event::PageDown),
                KeyCode::Home => Some(Event::Home),
                KeyCode::End => Some(Event::End),
                _ => None,
            }
        }
        CrosstermEvent::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Event::Click {
                x: mouse.column,
                y: mouse.row,
            }),
            MouseEventKind::ScrollUp => Some(Event::ScrollUp(3)),
            MouseEventKind::ScrollDown => Some(Event::ScrollDown(3)),
            _ => None,
        },
        CrosstermEvent::Resize(width, height) => Some(Event::Resize { width, height }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventState, MouseEvent};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_unmodified_w_toggles_wrap() {
        assert_eq!(
            convert_event(key(KeyCode::Char('w'), KeyModifiers::NONE)),
            Some(Event::ToggleWrap)
        );
        // A modified w is not the wrap shortcut.
        assert_eq!(
            convert_event(key(KeyCode::Char('w'), KeyModifiers::ALT)),
            None
        );
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(
            convert_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Event::Quit)
        );
        assert_eq!(
            convert_event(key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Event::Quit)
        );
        assert_eq!(
            convert_event(key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Event::Quit)
        );
    }

    #[test]
    fn test_key_release_is_ignored() {
        let event = CrosstermEvent::Key(KeyEvent {
            code: KeyCode::Char('w'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(convert_event(event), None);
    }

    #[test]
    fn test_left_click_carries_position() {
        let event = CrosstermEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 7,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(convert_event(event), Some(Event::Click { x: 7, y: 0 }));
    }

    #[test]
    fn test_resize_passes_through() {
        assert_eq!(
            convert_event(CrosstermEvent::Resize(120, 40)),
            Some(Event::Resize {
                width: 120,
                height: 40
            })
        );
    }
}
