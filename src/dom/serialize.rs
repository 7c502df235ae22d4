//! HTML serialization of arena subtrees.

use std::io;

use html5ever::QualName;
use html5ever::serialize::{Serialize, Serializer, TraversalScope};

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};

/// A node of an [`ArenaDom`] that html5ever's serializer can walk.
pub struct SerializableNode<'a> {
    dom: &'a ArenaDom,
    id: ArenaNodeId,
}

impl<'a> SerializableNode<'a> {
    pub fn new(dom: &'a ArenaDom, id: ArenaNodeId) -> Self {
        Self { dom, id }
    }
}

enum SerializeOp {
    Open(ArenaNodeId),
    Close(QualName),
}

impl Serialize for SerializableNode<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        let mut ops = match traversal_scope {
            TraversalScope::IncludeNode => vec![SerializeOp::Open(self.id)],
            TraversalScope::ChildrenOnly(_) => {
                let mut children: Vec<_> =
                    self.dom.children(self.id).map(SerializeOp::Open).collect();
                children.reverse();
                children
            }
        };

        while let Some(op) = ops.pop() {
            match op {
                SerializeOp::Open(id) => {
                    let Some(node) = self.dom.get(id) else {
                        continue;
                    };
                    match &node.data {
                        ArenaNodeData::Element { name, attrs, .. } => {
                            serializer.start_elem(
                                name.clone(),
                                attrs.iter().map(|a| (&a.name, a.value.as_str())),
                            )?;
                            ops.push(SerializeOp::Close(name.clone()));
                            let children: Vec<_> = self.dom.children(id).collect();
                            ops.extend(children.into_iter().rev().map(SerializeOp::Open));
                        }
                        ArenaNodeData::Doctype { name, .. } => serializer.write_doctype(name)?,
                        ArenaNodeData::Text(text) => serializer.write_text(text)?,
                        ArenaNodeData::Comment(text) => serializer.write_comment(text)?,
                        ArenaNodeData::Document => {
                            let children: Vec<_> = self.dom.children(id).collect();
                            ops.extend(children.into_iter().rev().map(SerializeOp::Open));
                        }
                    }
                }
                SerializeOp::Close(name) => serializer.end_elem(name)?,
            }
        }

        Ok(())
    }
}

/// Serialize the children of `id` (the whole document when `id` is the root).
pub fn serialize_children(dom: &ArenaDom, id: ArenaNodeId) -> String {
    serialize_with(dom, id, TraversalScope::ChildrenOnly(None))
}

/// Serialize `id` itself, including its own tags.
pub fn serialize_outer(dom: &ArenaDom, id: ArenaNodeId) -> String {
    serialize_with(dom, id, TraversalScope::IncludeNode)
}

fn serialize_with(dom: &ArenaDom, id: ArenaNodeId, traversal_scope: TraversalScope) -> String {
    let mut bytes = Vec::new();
    let opts = html5ever::serialize::SerializeOpts {
        traversal_scope,
        ..Default::default()
    };
    // Writing into a Vec cannot fail
    if html5ever::serialize::serialize(&mut bytes, &SerializableNode::new(dom, id), opts).is_err() {
        return String::new();
    }
    String::from_utf8(bytes).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use html5ever::driver::ParseOpts;
    use html5ever::parse_document;
    use html5ever::tendril::TendrilSink;

    use super::*;
    use crate::dom::tree_sink::ArenaSink;

    fn parse_html(html: &str) -> ArenaDom {
        parse_document(ArenaSink::new(), ParseOpts::default())
            .from_utf8()
            .one(html.as_bytes())
            .into_dom()
    }

    #[test]
    fn test_document_round_trip() {
        let html = "<!DOCTYPE html><html><head><title>Book</title></head>\
                    <body><p class=\"lead\">A &amp; B</p><!-- note --></body></html>";
        let dom = parse_html(html);
        assert_eq!(serialize_children(&dom, dom.document()), html);
    }

    #[test]
    fn test_outer_html() {
        let dom = parse_html(r#"<div id="x"><br><span>hi</span></div>"#);
        let div = dom.find_by_tag("div").unwrap();
        assert_eq!(
            serialize_outer(&dom, div),
            r#"<div id="x"><br><span>hi</span></div>"#
        );
        assert_eq!(serialize_children(&dom, div), "<br><span>hi</span>");
    }
}
