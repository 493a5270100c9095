//! JSON renderer: structured output for tooling integration.
//!
//! Serializes the Document model directly, one compact object per line, so
//! several documents in a row form NDJSON.

use crate::error::RenderError;
use crate::model::Document;
use crate::render::Renderer;
use std::io::Write;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, out: &mut dyn Write, doc: &Document) -> Result<(), RenderError> {
        serde_json::to_writer(&mut *out, doc)?;
        writeln!(out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use crate::parser::parse_str;

    fn render(doc: &Document) -> String {
        let mut out = Vec::new();
        JsonRenderer.render(&mut out, doc).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_document() {
        assert_eq!(render(&Document::default()), "{\"meta\":{}}\n");
    }

    #[test]
    fn single_line_with_trailing_newline() {
        let doc = parse_str("#?/description\n # one\n # two\n ##\n#@/public\n ##\n");
        let out = render(&doc);
        assert!(out.ends_with('\n'));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn does_not_escape_html() {
        let doc = Document {
            meta: Meta {
                synopsis: Some("tool <cmd> && more".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(render(&doc).contains("tool <cmd> && more"));
    }

    #[test]
    fn loads_back() {
        let doc = parse_str(
            "#!/bin/bash
#?/name deploy
#@/subcommand push
 # Deploy it.
 # @option -t | --target [env=staging] Target
 # @operand [files...] Files
 # @deprecated
 ##
cmd_push() { :; }
",
        );
        let back: Document = serde_json::from_str(&render(&doc)).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn field_names() {
        let doc = parse_str("#@/subcommand push\n # @stdin Data\n ##\ncmd_push() { :; }\n");
        let json: serde_json::Value = serde_json::from_str(&render(&doc)).unwrap();
        let block = &json["blocks"][0];
        assert_eq!(block["functionName"], "cmd_push");
        assert_eq!(block["stdin"], serde_json::json!({ "description": "Data", "line": 2 }));
        assert!(block.get("flags").is_none());
        assert!(json.get("warnings").is_none());
    }
}
