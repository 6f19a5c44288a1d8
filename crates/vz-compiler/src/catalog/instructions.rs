use super::tables::*;
use super::{Arity, IdentifierDefinition};
use crate::ast::AstNode;

fn def(identifier: impl Into<String>, element: &str, arity: usize) -> IdentifierDefinition {
    IdentifierDefinition::new(identifier, element, Arity::Exact(arity))
}

fn set_craft_property(identifier: &str, style: &str, arity: usize) -> IdentifierDefinition {
    def(identifier, "SetCraftProperty", arity)
        .attr("property", identifier)
        .attr("style", style)
}

pub(super) fn instruction_definitions() -> Vec<IdentifierDefinition> {
    let mut definitions = Vec::new();
    base_definitions(&mut definitions);
    navigation_definitions(&mut definitions);
    output_definitions(&mut definitions);
    part_and_list_definitions(&mut definitions);
    broadcast_definitions(&mut definitions);
    mfd_definitions(&mut definitions);
    definitions
}

fn base_definitions(definitions: &mut Vec<IdentifierDefinition>) {
    definitions.push(def("ActivateStage", "ActivateStage", 0).attr("style", "activate-stage"));
    definitions.push(def("SetTarget", "SetTarget", 1).attr("style", "set-target"));
    definitions.push(def("AG.Set", "SetActivationGroup", 2).attr("style", "set-ag"));
    definitions.push(def("Craft.Switch", "SwitchCraft", 1).attr("style", "switch-craft"));
    definitions.push(set_craft_property("Sound.Beep", "play-beep", 3));
    definitions.push(def("UserInput", "UserInput", 2).attr("style", "user-input"));

    for input in INPUTS {
        definitions.push(
            def(format!("Input.Set{input}"), "SetInput", 1)
                .attr("input", lower_first(input))
                .attr("style", "set-input"),
        );
    }
}

fn navigation_definitions(definitions: &mut Vec<IdentifierDefinition>) {
    for indicator in INDICATOR_TYPES {
        definitions.push(
            def(format!("Nav.Lock{indicator}"), "LockNavSphere", 0)
                .attr("indicatorType", *indicator)
                .attr("style", "lock-nav-sphere"),
        );
    }
    definitions.push(
        def("Nav.LockVector", "LockNavSphere", 1)
            .attr("indicatorType", "Vector")
            .attr("style", "lock-nav-sphere-vector"),
    );

    for (identifier, property) in AUTOPILOT_HEADING_SETTERS {
        definitions.push(
            def(*identifier, "SetTargetHeading", 1)
                .attr("property", *property)
                .attr("style", "set-heading"),
        );
    }

    for mode in TIME_MODES {
        definitions.push(
            def(format!("SetTimeMode.{mode}"), "SetTimeMode", 0)
                .attr("mode", *mode)
                .attr("style", "set-time-mode"),
        );
    }
}

fn output_definitions(definitions: &mut Vec<IdentifierDefinition>) {
    definitions.push(
        def("Display", "DisplayMessage", 1)
            .attr("style", "display")
            .post_argument(AstNode::number("7")),
    );
    definitions.push(def("Log.Message", "LogMessage", 1).attr("style", "log"));
    definitions.push(def("Log.Flight", "LogFlight", 2).attr("style", "flightlog"));

    for property in CAMERA_PROPERTIES {
        definitions.push(
            def(format!("Camera.{property}"), "SetCameraProperty", 1)
                .attr("property", lower_first(property))
                .attr("style", "set-camera"),
        );
    }
}

fn part_and_list_definitions(definitions: &mut Vec<IdentifierDefinition>) {
    for setter in CRAFT_PART_SETTERS {
        definitions.push(set_craft_property(setter, "set-part", 2));
    }
    for (op, arity) in LIST_INSTRUCTIONS {
        definitions.push(
            def(format!("List.{op}"), "SetList", *arity)
                .attr("op", *op)
                .attr("style", "list-op"),
        );
    }
}

fn broadcast_definitions(definitions: &mut Vec<IdentifierDefinition>) {
    let broadcasts = [
        ("Broadcast.This", "false", "true", "broadcast-msg"),
        ("Broadcast.Craft", "false", "false", "broadcast-msg-craft"),
        ("Broadcast.Nearby", "true", "true", "broadcast-msg-all-crafts"),
    ];
    for (identifier, global, local, style) in broadcasts {
        definitions.push(
            def(identifier, "BroadcastMessage", 2)
                .attr("global", global)
                .attr("local", local)
                .attr("style", style),
        );
    }
}

fn mfd_definitions(definitions: &mut Vec<IdentifierDefinition>) {
    for widget in MFD_WIDGET_TYPES {
        definitions.push(set_craft_property(
            &format!("Mfd.Create.{widget}"),
            "create-mfd-widget",
            1,
        ));
    }
    for property in MFD_WIDGET_PROPERTIES {
        definitions.push(set_craft_property(&format!("Mfd.Set{property}"), "set-mfd-widget", 2));
    }
    for anchor in MFD_ANCHOR_POSITIONS {
        definitions.push(set_craft_property(
            &format!("Mfd.Widget.SetAnchor.{anchor}"),
            "set-mfd-anchor",
            1,
        ));
        definitions.push(set_craft_property(
            &format!("Mfd.Label.SetAlignment.{anchor}"),
            "set-mfd-alignment",
            1,
        ));
    }

    definitions.push(set_craft_property("Mfd.Texture.Initialize", "set-mfd-texture-initialize", 3));
    definitions.push(set_craft_property("Mfd.Texture.SetPixel", "set-mfd-texture-setpixel", 4));

    for property in MFD_LABEL_PROPERTIES {
        definitions.push(set_craft_property(&format!("Mfd.Label.Set{property}"), "set-mfd-label", 2));
    }
    for property in MFD_SPRITE_PROPERTIES {
        definitions.push(set_craft_property(
            &format!("Mfd.Sprite.Set{property}"),
            "set-mfd-sprite",
            2,
        ));
    }
    for property in MFD_GAUGE_PROPERTIES {
        definitions.push(set_craft_property(&format!("Mfd.Gauge.Set{property}"), "set-mfd-gauge", 2));
    }
    for instruction in MFD_LINE_INSTRUCTIONS {
        definitions.push(set_craft_property(&format!("Mfd.Line.{instruction}"), "set-mfd-line", 2));
    }
    definitions.push(set_craft_property("Mfd.Line.SetLinePoints", "set-mfd-line-points", 3));
    for instruction in MFD_NAVBALL_INSTRUCTIONS {
        definitions.push(set_craft_property(
            &format!("Mfd.Navball.{instruction}"),
            "set-mfd-navball",
            2,
        ));
    }
    for instruction in MFD_MAP_INSTRUCTIONS {
        definitions.push(set_craft_property(&format!("Mfd.Map.{instruction}"), "set-mfd-map", 2));
    }

    definitions.push(set_craft_property("Mfd.Order.SendToFront", "set-mfd-order-front", 2));
    definitions.push(set_craft_property("Mfd.Order.SendToBack", "set-mfd-order-back", 2));
    for event in MFD_EVENTS {
        definitions.push(set_craft_property(&format!("Mfd.Event.Set{event}"), "set-mfd-event", 3));
    }
    definitions.push(set_craft_property("Mfd.Destroy", "destroy-mfd-widget", 1));
    definitions.push(set_craft_property("Mfd.Destroy.All", "destroy-all-mfd-widgets", 0));
}

#[cfg(test)]
mod instructions_tests {
    use super::*;

    fn find(id: &str) -> IdentifierDefinition {
        instruction_definitions()
            .into_iter()
            .find(|definition| definition.identifier == id)
            .expect("definition")
    }

    #[test]
    fn input_setters_lower_the_input_name() {
        let throttle = find("Input.SetThrottle");
        assert_eq!(throttle.xml_element, "SetInput");
        assert_eq!(throttle.static_attributes.get("input").map(String::as_str), Some("throttle"));
    }

    #[test]
    fn heading_setters_share_one_element() {
        let pitch = find("Nav.SetAutopilotPitch");
        assert_eq!(pitch.xml_element, "SetTargetHeading");
        assert_eq!(pitch.static_attributes.get("property").map(String::as_str), Some("pitch"));
        assert_eq!(heading_setter_for_property("pid-roll"), Some("Misc.SetPidRoll"));
        assert_eq!(heading_setter_for_property("yaw"), None);
    }

    #[test]
    fn broadcast_scopes() {
        let nearby = find("Broadcast.Nearby");
        assert_eq!(nearby.static_attributes.get("global").map(String::as_str), Some("true"));
        assert_eq!(nearby.static_attributes.get("local").map(String::as_str), Some("true"));
        assert_eq!(nearby.arity, Arity::Exact(2));
    }

    #[test]
    fn mfd_texture_pixel_setter_takes_four_arguments() {
        let set_pixel = find("Mfd.Texture.SetPixel");
        assert_eq!(set_pixel.xml_element, "SetCraftProperty");
        assert_eq!(set_pixel.arity, Arity::Exact(4));
        assert_eq!(find("Mfd.Destroy.All").arity, Arity::Exact(0));
    }
}
