//! Converts OuDiaSecond (`.oud2`) railway timetables into KDL documents.
//!
//! The crate compiles two ways: natively as the library behind the
//! `oudia-to-kdl` command line tool, and to wasm32 as the module driving the
//! converter page under `www/`. The conversion itself is synchronous text in,
//! text out; everything asynchronous (module startup, clipboard, file reads)
//! lives in the browser [`ui`] layer.

mod convert;
pub mod readiness;
#[cfg(target_arch = "wasm32")]
pub mod ui;

pub use convert::{convert, ConvertError};


#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Converts OuDiaSecond text to KDL, reporting parse failures as a JS string.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn convert_oud2_to_kdl(input: &str) -> Result<String, JsValue> {
    convert(input).map_err(|err| JsValue::from_str(&err.to_string()))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_start() {
    use crate::readiness::{LoadError, Readiness};

    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };
    let readiness = Readiness::new();
    let converter: ui::Converter = std::rc::Rc::new(convert_oud2_to_kdl);
    match ui::Controller::mount(&document, readiness.clone(), converter) {
        Ok(_controller) => readiness.resolve(Ok(())),
        Err(err) => {
            log::error!("failed to wire the converter page: {err:?}");
            // Best effort: the status element may itself be the missing piece.
            if let Some(status) = document.get_element_by_id("status") {
                status.set_text_content(Some(ui::LOAD_FAILED));
                let _ = status.class_list().add_1("error");
            }
            readiness.resolve(Err(LoadError::new(ui::LOAD_FAILED)));
        }
    }
}
