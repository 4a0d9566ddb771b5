use chord_matcher::{chord_name, HotkeyEvent, Notification};
use serde::Serialize;

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Record<'a> {
    Progress { partial: String },
    Triggered(&'a HotkeyEvent),
    Released(&'a HotkeyEvent),
}

impl<'a> From<&'a Notification> for Record<'a> {
    fn from(notification: &'a Notification) -> Self {
        match notification {
            Notification::ChordProgress(keys) => Record::Progress {
                partial: chord_name(keys),
            },
            Notification::HotkeyTriggered(event) => Record::Triggered(event),
            Notification::AllModifiersReleased(event) => Record::Released(event),
        }
    }
}

/// Renders a notification as one output line, either human readable or as a JSON object.
pub fn render(notification: &Notification, json: bool) -> Result<String, serde_json::Error> {
    if json {
        return serde_json::to_string(&Record::from(notification));
    }

    let line = match notification {
        Notification::ChordProgress(keys) => format!("progress {}", chord_name(keys)),
        Notification::HotkeyTriggered(event) => format!("triggered {}", describe(event)),
        Notification::AllModifiersReleased(event) => format!("released {}", describe(event)),
    };
    Ok(line)
}

fn describe(event: &HotkeyEvent) -> String {
    let mut text = event.chord_name.clone();
    if let Some(description) = &event.description {
        text.push_str(&format!(" ({})", description));
    }

    let envelope = event
        .modifier_envelope_count
        .map_or_else(|| "-".to_string(), |count| count.to_string());

    format!(
        "{} count={} consecutive={} envelope={} follow_up={} continuously={}",
        text,
        event.count,
        event.consecutive_count,
        envelope,
        event.follow_up,
        event.continuously
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chord_matcher::parse_chord;

    fn event(chord: &str, description: Option<&str>) -> HotkeyEvent {
        let chord = parse_chord(chord).unwrap();
        HotkeyEvent {
            keys: chord.keys().to_vec(),
            chord_name: chord.to_string(),
            count: 2,
            consecutive_count: 1,
            modifier_envelope_count: None,
            description: description.map(str::to_string),
            follow_up: false,
            continuously: false,
        }
    }

    #[test]
    fn test_render_human_readable() {
        let progress = Notification::ChordProgress(parse_chord("Ctrl+K").unwrap().keys().to_vec());
        assert_eq!(render(&progress, false).unwrap(), "progress Ctrl+K");

        let triggered = Notification::HotkeyTriggered(event("Ctrl+K, Ctrl+C", Some("copy")));
        assert_eq!(
            render(&triggered, false).unwrap(),
            "triggered Ctrl+K, Ctrl+C (copy) count=2 consecutive=1 envelope=- follow_up=false continuously=false"
        );

        let released = Notification::AllModifiersReleased(event("F1", None));
        assert!(render(&released, false)
            .unwrap()
            .starts_with("released F1 count=2"));
    }

    #[test]
    fn test_render_json() {
        let triggered = Notification::HotkeyTriggered(event("Ctrl+S", Some("save")));
        let value: serde_json::Value =
            serde_json::from_str(&render(&triggered, true).unwrap()).unwrap();

        assert_eq!(value["type"], "triggered");
        assert_eq!(value["chord_name"], "Ctrl+S");
        assert_eq!(value["keys"], serde_json::json!(["Ctrl+S"]));
        assert_eq!(value["description"], "save");
        assert_eq!(value["count"], 2);
        assert!(value["modifier_envelope_count"].is_null());

        let progress = Notification::ChordProgress(parse_chord("Alt+X").unwrap().keys().to_vec());
        assert_eq!(
            render(&progress, true).unwrap(),
            r#"{"type":"progress","partial":"Alt+X"}"#
        );
    }
}
