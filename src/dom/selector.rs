// Minimal CSS selector matching
//
// Supports what the page contract needs: descendant combinators, comma
// lists, and compound parts made of a tag, `#id`, `.class`, `[attr]` and
// `[attr="value"]`. Anything else simply fails to match.

use super::{Document, ElementId};

/// One `[attr]` / `[attr="value"]` test
#[derive(Debug, Clone, PartialEq)]
struct AttributeTest {
    name: String,
    value: Option<String>,
}

/// A compound selector such as `a.active[href="#home"]`
#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeTest>,
    invalid: bool,
}

impl Compound {
    fn parse(input: &str) -> Self {
        let mut compound = Compound::default();
        let mut rest = input;

        let tag_end = rest.find(['#', '.', '[']).unwrap_or(rest.len());
        if tag_end > 0 {
            let tag = &rest[..tag_end];
            if tag != "*" {
                compound.tag = Some(tag.to_ascii_lowercase());
            }
        }
        rest = &rest[tag_end..];

        while let Some(first) = rest.chars().next() {
            match first {
                '#' | '.' => {
                    let body = &rest[1..];
                    let end = body.find(['#', '.', '[']).unwrap_or(body.len());
                    let name = body[..end].to_string();
                    if first == '#' {
                        compound.id = Some(name);
                    } else {
                        compound.classes.push(name);
                    }
                    rest = &body[end..];
                }
                '[' => {
                    let Some(close) = rest.find(']') else {
                        compound.invalid = true;
                        break;
                    };
                    let inner = &rest[1..close];
                    let test = match inner.split_once('=') {
                        Some((name, value)) => AttributeTest {
                            name: name.trim().to_string(),
                            value: Some(value.trim().trim_matches(['"', '\'']).to_string()),
                        },
                        None => AttributeTest {
                            name: inner.trim().to_string(),
                            value: None,
                        },
                    };
                    compound.attributes.push(test);
                    rest = &rest[close + 1..];
                }
                _ => {
                    compound.invalid = true;
                    break;
                }
            }
        }
        compound
    }

    fn matches(&self, doc: &Document, id: ElementId) -> bool {
        if self.invalid {
            return false;
        }
        let element = doc.element(id);
        if let Some(tag) = &self.tag {
            if element.tag() != tag {
                return false;
            }
        }
        if let Some(wanted) = &self.id {
            if element.id() != Some(wanted.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| element.has_class(c)) {
            return false;
        }
        self.attributes.iter().all(|test| match &test.value {
            Some(value) => element.attribute(&test.name) == Some(value.as_str()),
            None => element.has_attribute(&test.name),
        })
    }
}

/// A parsed selector list (`a, button` / `nav ul li a`)
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    alternatives: Vec<Vec<Compound>>,
}

impl Selector {
    pub fn parse(input: &str) -> Self {
        let alternatives = input
            .split(',')
            .map(|alt| alt.split_whitespace().map(Compound::parse).collect::<Vec<_>>())
            .filter(|chain| !chain.is_empty())
            .collect();
        Self { alternatives }
    }

    pub fn matches(&self, doc: &Document, id: ElementId) -> bool {
        self.alternatives
            .iter()
            .any(|chain| chain_matches(doc, id, chain))
    }
}

/// Right-to-left descendant matching: the last compound must match `id`,
/// the rest must match some chain of ancestors in order.
fn chain_matches(doc: &Document, id: ElementId, chain: &[Compound]) -> bool {
    let Some((last, ancestors)) = chain.split_last() else {
        return false;
    };
    if !last.matches(doc, id) {
        return false;
    }
    let mut remaining = ancestors;
    let mut current = doc.element(id).parent();
    while let Some((wanted, rest)) = remaining.split_last() {
        let Some(candidate) = current else {
            return false;
        };
        if wanted.matches(doc, candidate) {
            remaining = rest;
        }
        current = doc.element(candidate).parent();
    }
    true
}
