use vz_compiler::{format_source, import_xml_str, print_code, text_to_xml, xml_to_text, AstNode};
use vz_core::ProblemLog;
use vz_parser::{parse_xml_document, XmlElementNode};

const FLIGHT_PROGRAM: &str = r#"#program "Ascent"
var speed
var stage
list targets

#pos "10,20"
on FlightStart {
  // climb out
  speed = 1 + 2 * 3
  while speed < 100 {
    speed += 1
    wait 0.5
  }
  for i = 1 to 3 step 2 {
    Display String.join("stage ", i)
  }
  if stage == 1 {
    ActivateStage
  } else if stage == 2 {
    break
  } else {
    Log.Message "done"
  }
}

on "abort"(data) {
  stage = not data and speed > 5
}

#fmt "move _ by _"
def Move(part, amount) {
  repeat amount {
    Display part
  }
}

def expression twice(x): x * 2
"#;

fn to_xml(source: &str) -> String {
    let mut log = ProblemLog::new();
    let xml = text_to_xml(source, &mut log).expect("export");
    assert!(!log.has_errors(), "problems: {:?}", log.problems);
    xml
}

fn root(xml: &str) -> XmlElementNode {
    parse_xml_document(xml).expect("xml").root
}

#[test]
fn printed_text_is_a_fixed_point() {
    let mut log = ProblemLog::new();
    let once = format_source(FLIGHT_PROGRAM, &mut log);
    assert!(!log.has_errors(), "problems: {:?}", log.problems);
    let twice = format_source(&once, &mut log);
    assert_eq!(once, twice);
}

#[test]
fn xml_survives_an_import_and_reexport() {
    let first = to_xml(FLIGHT_PROGRAM);
    let text = xml_to_text(&first).expect("import");
    let second = to_xml(&text);
    assert_eq!(first, second, "reimported text:\n{}", text);
}

#[test]
fn imported_text_keeps_declarations() {
    let text = xml_to_text(&to_xml(FLIGHT_PROGRAM)).expect("import");
    assert!(text.starts_with("#program \"Ascent\"\n"), "{}", text);
    assert!(text.contains("#pos \"10,20\"\non FlightStart {"), "{}", text);
    assert!(text.contains("on \"abort\"(data) {"), "{}", text);
    assert!(text.contains("#fmt \"move _ by _\"\ndef Move(part, amount) {"), "{}", text);
    assert!(text.contains("def expression twice(x): x * 2"), "{}", text);
    assert!(text.contains("} else if stage == 2 {"), "{}", text);
}

#[test]
fn else_if_chain_is_rebuilt_from_siblings() {
    let text = xml_to_text(&to_xml("var a\nvar b\n{\n  if a {\n    break\n  } else if b {\n    break\n  } else {\n    wait 1\n  }\n}\n"))
        .expect("import");
    assert!(
        text.contains("if a {\n    break\n  } else if b {\n    break\n  } else {\n    wait 1\n  }"),
        "{}",
        text
    );
}

#[test]
fn join_terminator_is_added_and_dropped_again() {
    let xml = to_xml("{\n  Log.Message String.join(\"a\", \"b\")\n}\n");
    let document = root(&xml);
    let join = document
        .child_named("Instructions")
        .and_then(XmlElementNode::first_element)
        .and_then(XmlElementNode::first_element)
        .expect("join");
    assert_eq!(join.element_children().count(), 3);

    let text = xml_to_text(&xml).expect("import");
    assert!(text.contains("Log.Message String.join(\"a\", \"b\")"), "{}", text);
}

#[test]
fn historical_property_alias_imports_under_the_current_name() {
    let xml = r#"<Program name="p"><Instructions><LogMessage id="0" style="log"><CraftProperty property="Mfd.LocaltoDisplay" style="prop-mfd"><Constant text="w" /><Constant number="0" /></CraftProperty></LogMessage></Instructions></Program>"#;
    let text = xml_to_text(xml).expect("import");
    assert!(text.contains("Log.Message Mfd.LocalToDisplay(\"w\", 0)"), "{}", text);
}

#[test]
fn directives_apply_to_one_declaration_only() {
    let xml = to_xml("#pos \"1,1\"\ndef A() {\n}\ndef B() {\n}\n");
    let document = root(&xml);
    let heads = document
        .element_children()
        .filter(|child| child.name == "Instructions")
        .filter_map(XmlElementNode::first_element)
        .collect::<Vec<_>>();
    assert_eq!(heads.len(), 2);
    assert_eq!(heads[0].attr("pos"), Some("1,1"));
    assert_eq!(heads[1].attr("pos"), None);
}

#[test]
fn program_directive_names_the_document() {
    let document = root(&to_xml("#program \"Lander\"\n"));
    assert_eq!(document.attr("name"), Some("Lander"));
}

#[test]
fn import_returns_nothing_for_foreign_roots() {
    assert!(import_xml_str("<Craft />").expect("parse").is_none());
    let ast = import_xml_str(&to_xml("var x\n")).expect("parse").expect("program");
    assert!(matches!(ast, AstNode::Program(_)));
    assert!(print_code(&ast).contains("var x"));
}

#[test]
fn exponent_constants_survive_text() {
    let xml = r#"<Program name="p"><Variables><Variable name="x" number="0" /><Variable name="y" number="0" /></Variables><Instructions><SetVariable id="0" style="set-variable"><Variable list="false" local="false" variableName="x" /><Constant number="1e5" /></SetVariable><SetVariable id="1" style="set-variable"><Variable list="false" local="false" variableName="y" /><Constant number="2E-3" /></SetVariable></Instructions></Program>"#;
    let text = xml_to_text(xml).expect("import");
    assert!(text.contains("x = 1e5\n"), "{}", text);
    assert!(text.contains("y = 2E-3\n"), "{}", text);

    let reexported = to_xml(&text);
    assert!(reexported.contains(r#"number="1e5""#), "{}", reexported);
    assert!(reexported.contains(r#"number="2E-3""#), "{}", reexported);
}

#[test]
fn comments_inside_parentheses_are_ignored() {
    let xml = to_xml("var x\n{\n  x = (1 + // note\n    2) * 3\n}\n");
    let text = xml_to_text(&xml).expect("import");
    assert!(text.contains("x = (1 + 2) * 3"), "{}", text);
}
