use vz_core::VzError;
use vz_parser::XmlElementNode;

use super::expression::expression;
use super::quarantine;
use crate::ast::*;
use crate::catalog::tables::{heading_setter_for_property, upper_first};

/// Imports a run of sibling statement elements. `ElseIf` elements are
/// consumed by the `If` that precedes them.
pub(super) fn statements(elements: &[&XmlElementNode]) -> Result<Vec<AstNode>, VzError> {
    let mut nodes = Vec::new();
    for (index, element) in elements.iter().enumerate() {
        if let Some(node) = statement(element, &elements[index + 1..])? {
            nodes.push(node);
        }
    }
    Ok(nodes)
}

fn body(element: &XmlElementNode) -> Result<Vec<AstNode>, VzError> {
    match element.child_named("Instructions") {
        Some(instructions) => {
            let children = instructions.element_children().collect::<Vec<_>>();
            statements(&children)
        }
        None => Ok(Vec::new()),
    }
}

fn children(element: &XmlElementNode) -> Result<Vec<AstNode>, VzError> {
    element
        .element_children()
        .filter(|child| child.name != "Instructions")
        .map(|child| expression(Some(child)))
        .collect()
}

fn builtin(identifier: impl Into<String>, arguments: Vec<AstNode>) -> AstNode {
    AstNode::instruction(identifier, InstructionKind::Builtin, arguments)
}

fn statement(
    element: &XmlElementNode,
    following: &[&XmlElementNode],
) -> Result<Option<AstNode>, VzError> {
    let attr = |name: &str| element.attr(name);
    let node = match element.name.as_str() {
        "If" => if_chain(element, following)?,
        "ElseIf" => return Ok(None),
        "While" => AstNode::While(WhileNode {
            condition: Box::new(expression(element.first_element())?),
            body: body(element)?,
            loc: None,
        }),
        "Repeat" => AstNode::Repeat(RepeatNode {
            count: Box::new(expression(element.first_element())?),
            body: body(element)?,
            loc: None,
        }),
        "For" => {
            let mut parts = element.element_children();
            let start = expression(parts.next())?;
            let end = expression(parts.next())?;
            let step = expression(parts.next())?;
            AstNode::For(ForNode {
                var: attr("var").unwrap_or("i").to_string(),
                start: Box::new(start),
                end: Box::new(end),
                step: Box::new(step),
                body: body(element)?,
                locals: None,
                loc: None,
            })
        }
        "SetVariable" | "ChangeVariable" => {
            let mut parts = element.element_children();
            let target = expression(parts.next())?;
            let value = expression(parts.next())?;
            AstNode::Assignment(AssignmentNode {
                target: Box::new(target),
                operator: if element.name == "ChangeVariable" {
                    AssignOperator::Change
                } else {
                    AssignOperator::Set
                },
                value: Box::new(value),
                loc: None,
            })
        }
        "WaitSeconds" | "WaitUntil" => AstNode::Wait(WaitNode {
            wait_type: if element.name == "WaitUntil" {
                WaitType::Condition
            } else {
                WaitType::Seconds
            },
            condition: Box::new(expression(element.first_element())?),
            loc: None,
        }),
        "Break" => AstNode::Break(BreakNode::default()),
        "Comment" => AstNode::Comment(CommentNode {
            comment: element
                .child_named("Constant")
                .and_then(|constant| constant.attr("text"))
                .unwrap_or_default()
                .to_string(),
            loc: None,
        }),
        "CallCustomInstruction" => AstNode::instruction(
            attr("call").unwrap_or_default(),
            InstructionKind::Global,
            children(element)?,
        ),
        "SetInput" => {
            let input = attr("input").unwrap_or("slider1");
            builtin(format!("Input.Set{}", upper_first(input)), children(element)?)
        }
        "LockNavSphere" => {
            let indicator = attr("indicatorType").unwrap_or("None");
            builtin(format!("Nav.Lock{}", indicator), children(element)?)
        }
        "SetTimeMode" => {
            let mode = attr("mode").unwrap_or("Normal");
            builtin(format!("SetTimeMode.{}", mode), Vec::new())
        }
        "DisplayMessage" => builtin("Display", vec![expression(element.first_element())?]),
        "SetCameraProperty" => {
            let property = attr("property").unwrap_or("zoom");
            builtin(format!("Camera.{}", upper_first(property)), children(element)?)
        }
        "SetCraftProperty" => {
            let property = attr("property").unwrap_or("Part.SetActivated");
            builtin(property, children(element)?)
        }
        "SetTargetHeading" => {
            let identifier = attr("property")
                .and_then(heading_setter_for_property)
                .unwrap_or("Nav.SetAutopilotHeading");
            builtin(identifier, children(element)?)
        }
        "SetList" => {
            let op = attr("op").unwrap_or("add");
            builtin(format!("List.{}", op), children(element)?)
        }
        "BroadcastMessage" => {
            let identifier = match attr("style") {
                Some("broadcast-msg-craft") => "Broadcast.Craft",
                Some("broadcast-msg-all-crafts") => "Broadcast.Nearby",
                _ => "Broadcast.This",
            };
            builtin(identifier, children(element)?)
        }
        "ActivateStage" => builtin("ActivateStage", Vec::new()),
        "SetTarget" => builtin("SetTarget", children(element)?),
        "SetActivationGroup" => builtin("AG.Set", children(element)?),
        "SwitchCraft" => builtin("Craft.Switch", children(element)?),
        "LogMessage" => builtin("Log.Message", children(element)?),
        "LogFlight" => builtin("Log.Flight", children(element)?),
        "UserInput" => builtin("UserInput", children(element)?),
        _ => quarantine(element),
    };
    Ok(Some(node))
}

/// Rebuilds an `if` chain from the `ElseIf` siblings that directly follow
/// it. A sibling styled `else` ends the chain with a plain alternative.
fn if_chain(element: &XmlElementNode, following: &[&XmlElementNode]) -> Result<AstNode, VzError> {
    let alternative = match following.split_first() {
        Some((next, rest)) if next.name == "ElseIf" => {
            if next.attr("style") == Some("else") {
                body(next)?
            } else {
                vec![if_chain(next, rest)?]
            }
        }
        _ => Vec::new(),
    };
    Ok(AstNode::If(IfNode {
        condition: Box::new(expression(element.first_element())?),
        consequent: body(element)?,
        alternative,
        loc: None,
    }))
}
