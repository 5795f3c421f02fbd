use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyModifiers};
use futures::StreamExt;
use tokio::time::interval;

#[derive(Debug)]
pub enum PreviewEvent {
    TickFrame,
    Input(Event),
    Quit,
}

pub fn spawn_input_task() -> impl futures::Stream<Item = Event> {
    EventStream::new().filter_map(|event| async move { event.ok() })
}

pub fn start_frame_task(tx: tokio::sync::mpsc::Sender<PreviewEvent>, fps: u8) {
    let fps = fps.max(15);
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_millis(1000_u64 / u64::from(fps)));
        loop {
            ticker.tick().await;
            if tx.send(PreviewEvent::TickFrame).await.is_err() {
                break;
            }
        }
    });
}

/// Host-style button name for a key, e.g. `L`, `F6`, `PageUp`.
#[must_use]
pub fn button_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(ch) => ch.to_ascii_uppercase().to_string(),
        KeyCode::F(n) => format!("F{n}"),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Back".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::Insert => "Insert".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        _ => return None,
    };
    Some(name)
}

/// Modifier buttons held while `key` went down.
#[must_use]
pub fn held_buttons(key: &KeyEvent) -> Vec<String> {
    let mut held = Vec::new();
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        held.push("LeftShift".to_string());
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        held.push("LeftControl".to_string());
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        held.push("LeftAlt".to_string());
    }
    held
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_host_conventions() {
        assert_eq!(button_name(KeyCode::Char('l')).as_deref(), Some("L"));
        assert_eq!(button_name(KeyCode::F(6)).as_deref(), Some("F6"));
        assert_eq!(button_name(KeyCode::PageUp).as_deref(), Some("PageUp"));
        assert_eq!(button_name(KeyCode::Esc), None);
    }

    #[test]
    fn modifiers_become_held_buttons() {
        let key = KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT | KeyModifiers::ALT);
        assert_eq!(held_buttons(&key), ["LeftShift", "LeftAlt"]);
    }

    #[tokio::test(start_paused = true)]
    async fn frame_task_ticks_until_receiver_drops() {
        let (tx, mut rx) = tokio::sync::mpsc::channel(4);
        start_frame_task(tx, 30);
        for _ in 0..3 {
            let event = rx.recv().await.expect("frame tick");
            assert!(matches!(event, PreviewEvent::TickFrame));
        }
        drop(rx);
    }
}
