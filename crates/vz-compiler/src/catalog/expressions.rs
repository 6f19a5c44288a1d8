use super::tables::*;
use super::{Arity, IdentifierDefinition};
use crate::ast::AstNode;

fn def(identifier: impl Into<String>, element: &str, arity: usize) -> IdentifierDefinition {
    IdentifierDefinition::new(identifier, element, Arity::Exact(arity))
}

fn craft_property(identifier: &str, style: &str, arity: usize) -> IdentifierDefinition {
    def(identifier, "CraftProperty", arity)
        .attr("property", identifier)
        .attr("style", style)
}

pub(super) fn expression_definitions() -> Vec<IdentifierDefinition> {
    let mut definitions = Vec::new();
    math_definitions(&mut definitions);
    vector_definitions(&mut definitions);
    string_definitions(&mut definitions);
    planet_definitions(&mut definitions);
    list_definitions(&mut definitions);
    misc_definitions(&mut definitions);
    property_definitions(&mut definitions);
    mfd_definitions(&mut definitions);
    definitions
}

fn math_definitions(definitions: &mut Vec<IdentifierDefinition>) {
    for function in MATH_UNARY_FUNCTIONS {
        definitions.push(
            def(format!("Math.{function}"), "MathFunction", 1)
                .attr("function", *function)
                .attr("style", "op-math"),
        );
    }
    for (op, style) in MATH_BINARY_FUNCTION_STYLES {
        definitions.push(
            def(format!("Math.{op}"), "BinaryOp", 2)
                .attr("op", *op)
                .attr("style", *style),
        );
    }
}

fn vector_definitions(definitions: &mut Vec<IdentifierDefinition>) {
    definitions.push(def("Vec", "Vector", 3).attr("style", "vec"));
    for op in VECTOR_UNARY_OPS {
        definitions.push(
            def(format!("Vec.{op}"), "VectorOp", 1)
                .attr("op", *op)
                .attr("style", "vec-op-1"),
        );
    }
    for op in VECTOR_BINARY_OPS {
        definitions.push(
            def(format!("Vec.{op}"), "VectorOp", 2)
                .attr("op", *op)
                .attr("style", "vec-op-2"),
        );
    }
    definitions.push(
        def("Vec.hex", "VectorOp", 1)
            .attr("op", "hex")
            .attr("style", "vec-op-color"),
    );
}

fn string_definitions(definitions: &mut Vec<IdentifierDefinition>) {
    let string_op = |op: &str, arity: Arity| {
        IdentifierDefinition::new(format!("String.{op}"), "StringOp", arity)
            .attr("op", op)
            .attr("style", op)
    };
    definitions.push(string_op("join", Arity::Variadic).post_argument(AstNode::string("")));
    definitions.push(string_op("length", Arity::Exact(1)));
    definitions.push(string_op("letter", Arity::Exact(2)));
    definitions.push(string_op("substring", Arity::Exact(3)));
    definitions.push(string_op("contains", Arity::Exact(2)));
    definitions.push(string_op("format", Arity::Variadic).post_argument(AstNode::string("")));

    for format in FRIENDLY_STRING_FORMATS {
        definitions.push(
            def(format!("String.friendly.{format}"), "StringOp", 1)
                .attr("op", "friendly")
                .attr("subOp", *format)
                .attr("style", "friendly"),
        );
    }
}

fn planet_definitions(definitions: &mut Vec<IdentifierDefinition>) {
    for op in PLANET_BASIC_OPS {
        definitions.push(
            def(format!("Planet.{op}"), "Planet", 1)
                .attr("op", *op)
                .attr("style", "planet"),
        );
    }
    for (op, style) in PLANET_POSITION_OPS {
        definitions.push(
            def(format!("Planet.{op}"), "Planet", 1)
                .attr("op", *op)
                .attr("style", *style),
        );
    }
}

fn list_definitions(definitions: &mut Vec<IdentifierDefinition>) {
    for (op, arity) in LIST_OPS {
        definitions.push(
            def(format!("List.{op}"), "ListOp", *arity)
                .attr("op", *op)
                .attr("style", "list-op"),
        );
    }
}

fn misc_definitions(definitions: &mut Vec<IdentifierDefinition>) {
    definitions.push(def("AG.Get", "ActivationGroup", 1).attr("style", "activation-group"));
    definitions.push(
        def("Sound.Frequency", "CraftProperty", 2)
            .attr("property", "Sound.Frequency")
            .attr("style", "note-frequency"),
    );
    definitions.push(def("funk", "EvaluateExpression", 1).attr("style", "evaluate-expression"));
}

fn property_definitions(definitions: &mut Vec<IdentifierDefinition>) {
    let groups: &[(&[&str], &str, usize)] = &[
        (ALTITUDE_PROPERTIES, "prop-altitude", 0),
        (ORBIT_PROPERTIES, "prop-orbit", 0),
        (ATMOSPHERE_PROPERTIES, "prop-atmosphere", 0),
        (PERFORMANCE_PROPERTIES, "prop-performance", 0),
        (FUEL_PROPERTIES, "prop-fuel", 0),
        (NAV_PROPERTIES, "prop-nav", 0),
        (VELOCITY_PROPERTIES, "prop-velocity", 0),
        (MISC_PROPERTIES, "prop-misc", 0),
        (TIME_PROPERTIES, "prop-time", 0),
        (NAME_PROPERTIES, "prop-name", 0),
        (TERRAIN_PROPERTIES, "terrain-query", 1),
        (PART_PROPERTIES, "part", 1),
        (CRAFT_PROPERTIES, "craft", 1),
    ];
    for (properties, style, arity) in groups {
        for property in *properties {
            definitions.push(craft_property(property, style, *arity));
        }
    }

    for input in INPUTS {
        definitions.push(craft_property(&format!("Input.{input}"), "prop-input", 0));
    }

    definitions.push(craft_property("Part.NameToID", "part-id", 1));
    definitions.push(craft_property("Craft.NameToID", "craft-id", 1));
    definitions.push(craft_property("Part.LocalToPci", "part-transform", 2));
    definitions.push(craft_property("Part.PciToLocal", "part-transform", 2));
    definitions.push(craft_property("Raycast", "raycast-query", 2));
}

fn mfd_definitions(definitions: &mut Vec<IdentifierDefinition>) {
    for property in MFD_WIDGET_PROPERTIES {
        definitions.push(craft_property(&format!("Mfd.{property}"), "prop-mfd-widget", 1));
    }
    definitions.push(craft_property("Mfd.Exists", "prop-mfd-widget", 1));

    for property in ["Text", "FontSize", "AutoSize", "Alignment"] {
        definitions.push(craft_property(&format!("Mfd.Label.{property}"), "prop-mfd-label", 1));
    }
    for property in MFD_SPRITE_PROPERTIES {
        definitions.push(craft_property(&format!("Mfd.Sprite.{property}"), "prop-mfd-sprite", 1));
    }
    for property in MFD_GAUGE_PROPERTIES {
        definitions.push(craft_property(&format!("Mfd.Gauge.{property}"), "prop-mfd-gauge", 1));
    }

    definitions.push(craft_property("Mfd.Texture.GetPixel", "prop-mfd-texture-getpixel", 3));
    definitions.push(
        def("Mfd.LocalToDisplay", "CraftProperty", 2)
            .attr("property", "Mfd.LocaltoDisplay")
            .attr("style", "prop-mfd-pos"),
    );
    definitions.push(craft_property("Mfd.DisplayToLocal", "prop-mfd-pos", 2));

    for event in MFD_EVENTS {
        definitions.push(craft_property(&format!("Mfd.Event.{event}"), "prop-mfd-event", 1));
    }
}
