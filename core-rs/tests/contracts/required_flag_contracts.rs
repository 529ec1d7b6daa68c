// Required flag contracts
//
// CONTRACT: a column is Required exactly when its bound value is the text
// `true` in some letter case. Unbound, `false`, any other text and IRIs
// are Optional.

use battinfo_core::report::RequiredFlag;
use battinfo_core::Binding;

fn literal(value: &str, datatype: &str) -> Binding {
    Binding::Literal {
        value: value.to_string(),
        datatype: datatype.to_string(),
        language: None,
    }
}

const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

#[test]
fn contract_true_in_any_case_is_required() {
    for text in ["true", "TRUE", "True", "tRuE"] {
        for datatype in [XSD_BOOLEAN, XSD_STRING] {
            assert_eq!(
                RequiredFlag::from_binding(Some(&literal(text, datatype))),
                RequiredFlag::Required,
                "{} ({})",
                text,
                datatype
            );
        }
    }
}

#[test]
fn contract_everything_else_is_optional() {
    let others = [
        literal("false", XSD_BOOLEAN),
        literal("FALSE", XSD_STRING),
        literal("1", XSD_BOOLEAN),
        literal("yes", XSD_STRING),
        literal("", XSD_STRING),
        literal("true-ish", XSD_STRING),
        literal(" true ", XSD_STRING),
        literal("true\n", XSD_STRING),
        Binding::Iri { value: "true".to_string() },
        Binding::Iri { value: "https://example.org/battery#Required".to_string() },
        Binding::BlankNode { value: "true".to_string() },
    ];
    for binding in &others {
        assert_eq!(RequiredFlag::from_binding(Some(binding)), RequiredFlag::Optional, "{:?}", binding);
    }
    assert_eq!(RequiredFlag::from_binding(None), RequiredFlag::Optional);
}

#[test]
fn contract_flag_text() {
    assert_eq!(RequiredFlag::Required.to_string(), "Required");
    assert_eq!(RequiredFlag::Optional.to_string(), "Optional");
}
