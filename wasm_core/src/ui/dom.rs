//! Small web-sys helpers used by the page controller.

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, File, FileReader, HtmlInputElement};

/// Advisory filter for the file picker; nothing is validated by extension.
pub const ACCEPTED_EXTENSIONS: &str = ".oud2,.oud,.txt,.text";

pub(crate) fn lookup<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id} element")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("element #{id} has an unexpected type")))
}

/// Creates the hidden `<input type="file">` backing the Open file button.
pub(crate) fn hidden_file_input(document: &Document) -> Result<HtmlInputElement, JsValue> {
    let input: HtmlInputElement = document
        .create_element("input")?
        .dyn_into()
        .map_err(|_| JsValue::from_str("input element has an unexpected type"))?;
    input.set_type("file");
    input.set_accept(ACCEPTED_EXTENSIONS);
    input.set_attribute("style", "display: none")?;
    document
        .body()
        .ok_or_else(|| JsValue::from_str("missing <body>"))?
        .append_child(&input)?;
    Ok(input)
}

/// Why a file selected by the user could not be loaded into the input field.
#[derive(Debug)]
pub enum FileReadError {
    /// The reader finished but its result was not a text value.
    NotText,
    /// The read itself failed; carries the reader's error object.
    Failed(JsValue),
}

/// Reads a [`File`] as text through a `FileReader`, suspending until the
/// load or error event fires.
pub async fn read_as_text(file: &File) -> Result<String, FileReadError> {
    let reader = FileReader::new().map_err(FileReadError::Failed)?;
    let done = Promise::new(&mut |resolve, reject| {
        let onload = Closure::once_into_js(move || {
            let _ = resolve.call0(&JsValue::NULL);
        });
        reader.set_onload(Some(onload.unchecked_ref()));
        let onerror = Closure::once_into_js(move || {
            let _ = reject.call0(&JsValue::NULL);
        });
        reader.set_onerror(Some(onerror.unchecked_ref()));
    });
    reader.read_as_text(file).map_err(FileReadError::Failed)?;

    if JsFuture::from(done).await.is_err() {
        let cause = reader
            .error()
            .map(JsValue::from)
            .unwrap_or_else(|| JsValue::from_str("file read aborted"));
        return Err(FileReadError::Failed(cause));
    }
    reader
        .result()
        .map_err(FileReadError::Failed)?
        .as_string()
        .ok_or(FileReadError::NotText)
}
