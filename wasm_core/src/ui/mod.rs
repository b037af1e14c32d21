//! Browser controller for the converter page.
//!
//! Five independent triggers — convert, copy, download, open file, file
//! selected — each bound to its own handler. The only coordination between
//! them is the startup [`Readiness`] gate on convert; everything else is
//! last-writer-wins on the status line, matching the page's stateless
//! design. Every handler recovers its own failures: nothing here panics or
//! propagates past the event boundary.

mod dom;

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Blob, BlobPropertyBag, Document, File, HtmlAnchorElement, HtmlElement, HtmlInputElement,
    HtmlTextAreaElement, Url, Window,
};

use crate::readiness::Readiness;

pub use dom::{read_as_text, FileReadError, ACCEPTED_EXTENSIONS};

/// The narrow seam to the conversion capability: one text in, one text out,
/// or an error value of unspecified shape.
pub type Converter = Rc<dyn Fn(&str) -> Result<String, JsValue>>;

/// Status shown when the conversion capability never became available.
pub const LOAD_FAILED: &str = "Failed to load WebAssembly module.";

/// The page elements the controller reads and writes.
pub struct PageElements {
    pub input: HtmlTextAreaElement,
    pub output: HtmlTextAreaElement,
    pub status: HtmlElement,
    pub file_input: HtmlInputElement,
}

pub struct Controller {
    window: Window,
    document: Document,
    elements: PageElements,
    readiness: Readiness,
    converter: Converter,
}

impl Controller {
    pub fn new(
        window: Window,
        document: Document,
        elements: PageElements,
        readiness: Readiness,
        converter: Converter,
    ) -> Rc<Self> {
        Rc::new(Self {
            window,
            document,
            elements,
            readiness,
            converter,
        })
    }

    /// Looks up the page controls by id, creates the hidden file input and
    /// wires all five listeners.
    pub fn mount(
        document: &Document,
        readiness: Readiness,
        converter: Converter,
    ) -> Result<Rc<Self>, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let elements = PageElements {
            input: dom::lookup(document, "input")?,
            output: dom::lookup(document, "output")?,
            status: dom::lookup(document, "status")?,
            file_input: dom::hidden_file_input(document)?,
        };
        let controller = Self::new(window, document.clone(), elements, readiness, converter);
        controller.wire(document)?;
        Ok(controller)
    }

    fn wire(self: &Rc<Self>, document: &Document) -> Result<(), JsValue> {
        let convert: HtmlElement = dom::lookup(document, "convert")?;
        let copy: HtmlElement = dom::lookup(document, "copy")?;
        let download: HtmlElement = dom::lookup(document, "download")?;
        let open_file: HtmlElement = dom::lookup(document, "open-file")?;

        let ctrl = Rc::clone(self);
        listen(&convert, move || {
            let ctrl = Rc::clone(&ctrl);
            spawn_local(async move { ctrl.run_convert().await });
        })?;

        let ctrl = Rc::clone(self);
        listen(&copy, move || {
            let ctrl = Rc::clone(&ctrl);
            spawn_local(async move { ctrl.run_copy().await });
        })?;

        let ctrl = Rc::clone(self);
        listen(&download, move || ctrl.run_download())?;

        let ctrl = Rc::clone(self);
        listen(&open_file, move || ctrl.elements.file_input.click())?;

        let ctrl = Rc::clone(self);
        let on_change = Closure::<dyn FnMut()>::new(move || {
            let ctrl = Rc::clone(&ctrl);
            spawn_local(async move { ctrl.load_selected_file().await });
        });
        self.elements
            .file_input
            .add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
        on_change.forget();
        Ok(())
    }

    pub fn set_status(&self, message: &str, is_error: bool) {
        self.elements.status.set_text_content(Some(message));
        let classes = self.elements.status.class_list();
        if is_error {
            let _ = classes.add_1("error");
        } else {
            let _ = classes.remove_1("error");
        }
    }

    /// Converts the current input text, replacing the output field wholesale.
    pub async fn run_convert(&self) {
        self.set_status("Converting...", false);
        if let Err(err) = self.readiness.ready().await {
            log::error!("conversion unavailable: {err}");
            self.set_status(LOAD_FAILED, true);
            return;
        }
        match (self.converter)(&self.elements.input.value()) {
            Ok(result) => {
                self.elements.output.set_value(&result);
                self.elements.output.set_scroll_top(0);
                self.set_status("Conversion complete.", false);
            }
            Err(err) => {
                log::error!("conversion failed: {err:?}");
                self.set_status(&format_error(&err), true);
            }
        }
    }

    pub async fn run_copy(&self) {
        let text = self.elements.output.value();
        if text.is_empty() {
            self.set_status("No output to copy.", true);
            return;
        }
        let clipboard = self.window.navigator().clipboard();
        match JsFuture::from(clipboard.write_text(&text)).await {
            Ok(_) => self.set_status("Copied to clipboard.", false),
            Err(err) => {
                log::error!("copy failed: {err:?}");
                self.set_status("Unable to copy to clipboard.", true);
            }
        }
    }

    pub fn run_download(&self) {
        let text = self.elements.output.value();
        if text.is_empty() {
            self.set_status("No output to download.", true);
            return;
        }
        if let Err(err) = self.save_output(&text) {
            log::error!("download failed: {err:?}");
            self.set_status("Unable to prepare the download.", true);
            return;
        }
        self.set_status("Download ready.", false);
    }

    fn save_output(&self, text: &str) -> Result<(), JsValue> {
        let parts = js_sys::Array::of1(&JsValue::from_str(text));
        let options = BlobPropertyBag::new();
        options.set_type("text/plain");
        let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
        let url = Url::create_object_url_with_blob(&blob)?;
        // Release the object URL no matter how the click goes; repeated
        // downloads must not accumulate outstanding URLs.
        let clicked = self.click_anchor(&url);
        Url::revoke_object_url(&url)?;
        clicked
    }

    fn click_anchor(&self, url: &str) -> Result<(), JsValue> {
        let anchor: HtmlAnchorElement = self
            .document
            .create_element("a")?
            .dyn_into()
            .map_err(|_| JsValue::from_str("anchor element has an unexpected type"))?;
        anchor.set_href(url);
        anchor.set_download("output.kdl");
        let body = self
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("missing <body>"))?;
        body.append_child(&anchor)?;
        anchor.click();
        body.remove_child(&anchor)?;
        Ok(())
    }

    /// Handles the hidden file input's change event.
    pub async fn load_selected_file(&self) {
        let Some(file) = self.elements.file_input.files().and_then(|list| list.get(0)) else {
            return;
        };
        self.load_file(file).await;
    }

    pub async fn load_file(&self, file: File) {
        let name = file.name();
        self.set_status(&format!("Loading {name}..."), false);
        let contents = dom::read_as_text(&file).await;
        self.apply_file_read(&name, contents);
    }

    /// Applies a finished read to the page. On success the input field is
    /// replaced and the caret moved to the start; on failure it is left
    /// untouched. The file input is always cleared so the same file can be
    /// selected again.
    pub fn apply_file_read(&self, name: &str, contents: Result<String, FileReadError>) {
        match contents {
            Ok(text) => {
                self.elements.input.set_value(&text);
                let _ = self.elements.input.focus();
                let _ = self.elements.input.set_selection_range(0, 0);
                self.set_status(&format!("Loaded {name}."), false);
            }
            Err(FileReadError::NotText) => {
                self.set_status("Could not read file contents.", true);
            }
            Err(FileReadError::Failed(err)) => {
                log::error!("file read failed: {err:?}");
                self.set_status("Failed to read file.", true);
            }
        }
        self.elements.file_input.set_value("");
    }
}

fn listen(target: &HtmlElement, handler: impl FnMut() + 'static) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut()>::new(handler);
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Renders an arbitrary thrown value as a status message.
///
/// Text values pass through as-is, structured errors contribute their
/// message, anything else is JSON-serialized. An absent or empty value
/// yields a fixed fallback so the status line is never blank.
pub fn format_error(err: &JsValue) -> String {
    if err.is_null() || err.is_undefined() {
        return "Unknown error.".to_string();
    }
    if let Some(text) = err.as_string() {
        if text.is_empty() {
            return "Unknown error.".to_string();
        }
        return text;
    }
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        let message = String::from(error.message());
        if !message.is_empty() {
            return message;
        }
    }
    js_sys::JSON::stringify(err)
        .ok()
        .and_then(|text| text.as_string())
        .filter(|text| !text.is_empty() && text != "null" && text != "undefined")
        .unwrap_or_else(|| "Unexpected error.".to_string())
}
