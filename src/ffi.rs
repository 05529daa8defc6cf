//! FFI interface for C/C++ hosts
//!
//! One entry point turns a document into its JSON-LD documents. Results are
//! returned as JSON strings owned by Rust.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::config::Limits;
use crate::pipeline::generate;

/// Result struct returned to the host.
/// Both pointers are owned by Rust and must be freed via `free_schema_result`
#[repr(C)]
pub struct SchemaResultFFI {
    /// JSON array of schema.org documents (null-terminated)
    pub json_ptr: *mut c_char,
    /// Error message if synthesis failed (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

/// Synthesize JSON-LD for an HTML document.
///
/// # Arguments
/// * `html_ptr` - Pointer to HTML content (UTF-8, not necessarily null-terminated)
/// * `html_len` - Length of HTML content in bytes
/// * `url_ptr` - Absolute document URL (null-terminated)
///
/// # Returns
/// SchemaResultFFI with either json_ptr set (success) or error_ptr set (failure)
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `url_ptr` must be a valid null-terminated C string
/// - Caller must free the result via `free_schema_result`
#[no_mangle]
pub unsafe extern "C" fn schema_from_html(
    html_ptr: *const c_char,
    html_len: usize,
    url_ptr: *const c_char,
) -> SchemaResultFFI {
    let html = if html_ptr.is_null() || html_len == 0 {
        ""
    } else {
        let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
        match std::str::from_utf8(slice) {
            Ok(s) => s,
            Err(_) => return make_error_result("Invalid UTF-8 in HTML content"),
        }
    };

    if url_ptr.is_null() {
        return make_error_result("URL is null");
    }
    let url = match CStr::from_ptr(url_ptr).to_str() {
        Ok(s) => s,
        Err(_) => return make_error_result("Invalid UTF-8 in URL"),
    };

    let documents = match generate(html, url, &Limits::default()) {
        Ok(docs) => docs,
        Err(e) => return make_error_result(&e.to_string()),
    };

    match serde_json::to_string(&documents) {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => SchemaResultFFI {
                json_ptr: cstr.into_raw(),
                error_ptr: ptr::null_mut(),
            },
            Err(_) => make_error_result("Result JSON contains null bytes"),
        },
        Err(e) => make_error_result(&format!("Failed to serialize result: {}", e)),
    }
}

/// Free a SchemaResultFFI returned by schema_from_html
///
/// # Safety
/// - `result` must have been returned by `schema_from_html`
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn free_schema_result(result: SchemaResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

fn make_error_result(msg: &str) -> SchemaResultFFI {
    let error_cstr = CString::new(msg.replace('\0', " ")).unwrap_or_default();
    SchemaResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}
