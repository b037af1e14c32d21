//! KDL rendering of the parsed OuDiaSecond tree.

use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};

use super::Node;

pub(crate) fn to_kdl(root: &Node<'_>) -> String {
    let mut document = KdlDocument::new();
    document.nodes_mut().push(render(root));
    document.autoformat();
    document.to_string()
}

fn render(node: &Node<'_>) -> KdlNode {
    match node {
        Node::Block { name, children } => {
            let mut out = KdlNode::new(*name);
            if !children.is_empty() {
                let mut body = KdlDocument::new();
                body.nodes_mut().extend(children.iter().map(render));
                out.set_children(body);
            }
            out
        }
        Node::Field { key, values } => {
            let mut out = KdlNode::new(*key);
            for value in values {
                // List items keep whatever padding follows the comma; drop it.
                out.push(KdlEntry::new(KdlValue::String(value.trim().to_string())));
            }
            out
        }
    }
}
