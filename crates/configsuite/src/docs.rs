//! Plain-text outline of a schema, for `--describe` style help output.

use crate::schema::{Content, SchemaNode};
use crate::types::TypeKind;

/// Render `schema` as an indented outline, one line per node:
///
/// ```text
/// NamedDict
///   name: String, required
///   weight: Number, optional - Weight in kilograms
///   tags: List, required
///     <item>: String
/// ```
pub fn describe(schema: &SchemaNode) -> String {
    let mut out = String::new();
    write_line(&mut out, 0, Label::Root, schema);
    write_children(&mut out, 1, schema);
    out
}

enum Label<'a> {
    Root,
    Field(&'a str),
    Element(&'static str),
}

fn write_children(out: &mut String, depth: usize, schema: &SchemaNode) {
    match schema.content() {
        Content::Fields(fields) => {
            for (name, field) in fields {
                write_line(out, depth, Label::Field(name), field);
                write_children(out, depth + 1, field);
            }
        }
        Content::Element(element) => {
            let label = match schema.kind() {
                TypeKind::List => "<item>",
                _ => "<value>",
            };
            write_line(out, depth, Label::Element(label), element);
            write_children(out, depth + 1, element);
        }
        Content::None => {}
    }
}

fn write_line(out: &mut String, depth: usize, label: Label<'_>, node: &SchemaNode) {
    out.push_str(&"  ".repeat(depth));
    match label {
        Label::Root => out.push_str(node.kind().name()),
        // Requiredness only means something for named fields
        Label::Field(name) => {
            let required = if node.is_required() { "required" } else { "optional" };
            out.push_str(&format!("{}: {}, {}", name, node.kind(), required));
        }
        Label::Element(name) => out.push_str(&format!("{}: {}", name, node.kind())),
    }
    if let Some(description) = node.description() {
        out.push_str(" - ");
        out.push_str(description);
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_candidate_schema() {
        let schema = SchemaNode::named_dict()
            .field("name", SchemaNode::string())
            .field(
                "weight",
                SchemaNode::number()
                    .optional()
                    .with_description("Weight in kilograms"),
            )
            .field(
                "current_job",
                SchemaNode::named_dict()
                    .field("company_name", SchemaNode::string())
                    .field("position", SchemaNode::string().optional())
                    .build()
                    .unwrap()
                    .optional(),
            )
            .field("skills", SchemaNode::dict(SchemaNode::list(SchemaNode::string())))
            .build()
            .unwrap();

        insta::assert_snapshot!(describe(&schema), @r"
NamedDict
  name: String, required
  weight: Number, optional - Weight in kilograms
  current_job: NamedDict, optional
    company_name: String, required
    position: String, optional
  skills: Dict, required
    <value>: List
      <item>: String
");
    }

    #[test]
    fn test_describe_scalar_root() {
        let schema = SchemaNode::integer().with_description("Answer");
        assert_eq!(describe(&schema), "Integer - Answer\n");
    }
}
