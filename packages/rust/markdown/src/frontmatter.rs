//! Leading YAML front-matter detection and permissive metadata parsing.

use serde_yaml::{Mapping, Value};

/// Keys that may carry a document's explicit position, in priority order.
const POSITION_KEYS: &[&str] = &["sidebar_position", "position"];

/// Metadata recognized in a front-matter block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: Option<String>,
    pub position: Option<i64>,
}

/// Result of looking for a front-matter block at the start of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatter<'a> {
    /// The document does not start with a `---` fence.
    Absent { body: &'a str },
    /// A closed block: raw YAML between the fences, and the rest.
    Present { yaml: &'a str, body: &'a str },
    /// An opening fence with no closing fence.
    Unclosed { body: &'a str },
}

impl<'a> FrontMatter<'a> {
    /// Text following the block; the whole document when there is no valid block.
    pub fn body(&self) -> &'a str {
        match *self {
            Self::Absent { body } | Self::Present { body, .. } | Self::Unclosed { body } => body,
        }
    }
}

/// Split a leading `---` fenced block from the document text.
///
/// A UTF-8 BOM before the opening fence is ignored; fences may end in CRLF.
pub fn split_front_matter(raw: &str) -> FrontMatter<'_> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut lines = text.split_inclusive('\n');

    match lines.next() {
        Some(first) if is_fence(first) => {
            let yaml_start = first.len();
            let mut offset = yaml_start;
            for line in lines {
                if is_fence(line) {
                    return FrontMatter::Present {
                        yaml: &text[yaml_start..offset],
                        body: &text[offset + line.len()..],
                    };
                }
                offset += line.len();
            }
            FrontMatter::Unclosed { body: text }
        }
        _ => FrontMatter::Absent { body: text },
    }
}

fn is_fence(line: &str) -> bool {
    line.trim_end() == "---"
}

/// Parse a front-matter block. Unknown keys are ignored; recognized keys with
/// unusable values are treated as absent.
pub fn parse_metadata(yaml: &str) -> Result<Metadata, String> {
    if yaml.trim().is_empty() {
        return Ok(Metadata::default());
    }

    let value: Value = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
    match value {
        Value::Null => Ok(Metadata::default()),
        Value::Mapping(map) => Ok(Metadata {
            title: title_from(&map),
            position: position_from(&map),
        }),
        other => Err(format!(
            "expected a key/value mapping, found {}",
            value_kind(&other)
        )),
    }
}

fn title_from(map: &Mapping) -> Option<String> {
    let title = match map.get("title")? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!title.is_empty()).then_some(title)
}

fn position_from(map: &Mapping) -> Option<i64> {
    POSITION_KEYS
        .iter()
        .find_map(|key| map.get(*key))
        .and_then(|value| match value {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_closed_block() {
        let raw = "---\ntitle: Intro\nsidebar_position: 2\n---\n\n# Intro\n";
        assert_eq!(
            split_front_matter(raw),
            FrontMatter::Present {
                yaml: "title: Intro\nsidebar_position: 2\n",
                body: "\n# Intro\n",
            }
        );
    }

    #[test]
    fn no_block_when_first_line_is_not_a_fence() {
        let raw = "# Title\n---\nnot metadata\n---\n";
        assert_eq!(split_front_matter(raw), FrontMatter::Absent { body: raw });
    }

    #[test]
    fn handles_bom_and_crlf() {
        let raw = "\u{feff}---\r\ntitle: Win\r\n---\r\nBody\r\n";
        let fm = split_front_matter(raw);
        assert_eq!(
            fm,
            FrontMatter::Present {
                yaml: "title: Win\r\n",
                body: "Body\r\n",
            }
        );
        assert_eq!(parse_metadata("title: Win\r\n").unwrap().title.as_deref(), Some("Win"));
    }

    #[test]
    fn empty_block() {
        let fm = split_front_matter("---\n---\nbody");
        assert_eq!(fm, FrontMatter::Present { yaml: "", body: "body" });
        assert_eq!(parse_metadata("").unwrap(), Metadata::default());
    }

    #[test]
    fn unclosed_block_keeps_whole_text() {
        let raw = "---\ntitle: Oops\n\nBody";
        assert_eq!(split_front_matter(raw), FrontMatter::Unclosed { body: raw });
    }

    #[test]
    fn parses_title_and_sidebar_position() {
        let meta = parse_metadata("title: Payment Channels\nsidebar_position: 3\ntags: [a, b]\n")
            .unwrap();
        assert_eq!(meta.title.as_deref(), Some("Payment Channels"));
        assert_eq!(meta.position, Some(3));
    }

    #[test]
    fn accepts_plain_position_key_and_lenient_values() {
        assert_eq!(parse_metadata("position: 7").unwrap().position, Some(7));
        assert_eq!(parse_metadata("position: 4.0").unwrap().position, Some(4));
        assert_eq!(parse_metadata("position: \" 5 \"").unwrap().position, Some(5));
        assert_eq!(parse_metadata("position: 1.5").unwrap().position, None);
        assert_eq!(parse_metadata("position: [1]").unwrap().position, None);
        assert_eq!(
            parse_metadata("sidebar_position: 1\nposition: 9").unwrap().position,
            Some(1)
        );
    }

    #[test]
    fn non_string_titles_are_stringified() {
        assert_eq!(parse_metadata("title: 2024").unwrap().title.as_deref(), Some("2024"));
        assert_eq!(parse_metadata("title: \"  \"").unwrap().title, None);
        assert_eq!(parse_metadata("title: ~").unwrap().title, None);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(parse_metadata("title: [unclosed").is_err());
        let err = parse_metadata("- just\n- a list\n").unwrap_err();
        assert!(err.contains("sequence"));
    }
}
