/// Host event an `on` block can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDefinition {
    pub event: &'static str,
    pub style: &'static str,
    /// Parameter names the host binds when the event fires.
    pub local_vars: &'static [&'static str],
    /// `ReceiveMessage` carries a message filter constant.
    pub has_filter: bool,
}

const EVENT_DEFINITIONS: &[EventDefinition] = &[
    EventDefinition {
        event: "FlightStart",
        style: "flight-start",
        local_vars: &[],
        has_filter: false,
    },
    EventDefinition {
        event: "Docked",
        style: "craft-docked",
        local_vars: &["craftA", "craftB"],
        has_filter: false,
    },
    EventDefinition {
        event: "ChangeSoi",
        style: "change-soi",
        local_vars: &["planet"],
        has_filter: false,
    },
    EventDefinition {
        event: "ReceiveMessage",
        style: "receive-msg",
        local_vars: &["data"],
        has_filter: true,
    },
    EventDefinition {
        event: "PartExplode",
        style: "part-explode",
        local_vars: &["part"],
        has_filter: false,
    },
    EventDefinition {
        event: "PartCollision",
        style: "part-collision",
        local_vars: &["part", "other", "velocity", "impulse"],
        has_filter: false,
    },
];

pub fn event_definitions() -> &'static [EventDefinition] {
    EVENT_DEFINITIONS
}

pub fn event_definition(event: &str) -> Option<&'static EventDefinition> {
    EVENT_DEFINITIONS
        .iter()
        .find(|definition| definition.event == event)
}

#[cfg(test)]
mod events_tests {
    use super::*;

    #[test]
    fn only_receive_message_has_filter() {
        let filtered = event_definitions()
            .iter()
            .filter(|definition| definition.has_filter)
            .map(|definition| definition.event)
            .collect::<Vec<_>>();
        assert_eq!(filtered, vec!["ReceiveMessage"]);
    }

    #[test]
    fn lookup_by_name() {
        let collision = event_definition("PartCollision").expect("PartCollision");
        assert_eq!(collision.local_vars, &["part", "other", "velocity", "impulse"]);
        assert!(event_definition("Launch").is_none());
    }
}
