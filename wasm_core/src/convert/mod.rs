//! OuDiaSecond text to KDL document conversion.
//!
//! The `.oud2` format is a line-oriented tree: `Key=Value` pairs and blocks
//! opened by `Name.` and closed by a bare `.`. [`convert`] parses that shape
//! and renders it as a KDL document rooted in a single `file` node, so the
//! nesting of the timetable survives the trip verbatim.

mod emit;
mod parser;

use thiserror::Error;

/// Raised when the input is not a well-formed OuDiaSecond document.
///
/// The message carries pest's rendered diagnostic, including the line and
/// column pointer, so it is suitable for showing to the user as-is.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ConvertError {
    message: String,
}

impl From<pest::error::Error<parser::Rule>> for ConvertError {
    fn from(err: pest::error::Error<parser::Rule>) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// Intermediate tree shared between the parser and the KDL emitter.
///
/// Borrows from the input text; values are trimmed only at emit time so the
/// parser stays a pure slicing pass.
pub(crate) enum Node<'a> {
    Block {
        name: &'a str,
        children: Vec<Node<'a>>,
    },
    Field {
        key: &'a str,
        values: Vec<&'a str>,
    },
}

/// Converts OuDiaSecond timetable text into a formatted KDL document.
///
/// Empty input is valid and yields an empty `file` node.
///
/// # Examples
/// ```
/// use wasm_core::convert;
///
/// let kdl = convert("FileType=OuDiaSecond.1.13\n")?;
/// assert!(kdl.contains("FileType"));
/// # Ok::<(), wasm_core::ConvertError>(())
/// ```
pub fn convert(input: &str) -> Result<String, ConvertError> {
    let root = parser::parse(input)?;
    Ok(emit::to_kdl(&root))
}
