//! Pest-backed parser for the OuDiaSecond line format.

use pest::iterators::Pair;
use pest::Parser as _;

use super::Node;

#[derive(pest_derive::Parser)]
#[grammar = "oudiasecond.pest"]
struct OudiaSecondParser;

pub(crate) fn parse(input: &str) -> Result<Node<'_>, pest::error::Error<Rule>> {
    let file = OudiaSecondParser::parse(Rule::file, input)?
        .next()
        .expect("the file rule produces exactly one node");
    let wrapper = file
        .into_inner()
        .next()
        .expect("the file node always wraps the top-level sequence");
    Ok(lower(wrapper))
}

fn lower(pair: Pair<'_, Rule>) -> Node<'_> {
    match pair.as_rule() {
        // The top-level sequence behaves like an unnamed block.
        Rule::wrapper => Node::Block {
            name: "file",
            children: pair.into_inner().map(lower).collect(),
        },
        Rule::r#struct => {
            let mut inner = pair.into_inner();
            let name = inner
                .next()
                .expect("a struct always opens with a name")
                .as_str();
            Node::Block {
                name,
                children: inner.map(lower).collect(),
            }
        }
        Rule::kvpair => {
            let mut inner = pair.into_inner();
            let key = inner
                .next()
                .expect("a kvpair always starts with a key")
                .as_str();
            let values = match inner.next() {
                Some(value) if value.as_rule() == Rule::list => {
                    value.into_inner().map(|item| item.as_str()).collect()
                }
                Some(value) => vec![value.as_str()],
                None => Vec::new(),
            };
            Node::Field { key, values }
        }
        other => unreachable!("the grammar never surfaces {other:?} at tree level"),
    }
}
