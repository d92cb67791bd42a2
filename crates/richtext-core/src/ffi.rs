// SPDX-License-Identifier: AGPL-3.0-or-later
//! C FFI exports for native painters
//!
//! Painters outside Rust hand in the serialized document and receive the
//! interpretation result as JSON (see [`crate::formats::JsonRenderer`]).
//!
//! Returned strings are NUL-terminated, so a NUL inside document text is
//! replaced with U+FFFD in the output.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::formats::OutputFormat;
use crate::interpreter::DocumentInterpreter;
use crate::traits::RenderConfig;

/// Result code for FFI operations
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiResult {
    Success = 0,
    InvalidInput = 1,
    RenderError = 2,
    NullPointer = 3,
    Utf8Error = 4,
}

/// Output format for FFI
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub enum FfiFormat {
    PlainText = 0,
    Markdown = 1,
    Json = 2,
}

impl From<FfiFormat> for OutputFormat {
    fn from(f: FfiFormat) -> Self {
        match f {
            FfiFormat::PlainText => OutputFormat::PlainText,
            FfiFormat::Markdown => OutputFormat::Markdown,
            FfiFormat::Json => OutputFormat::Json,
        }
    }
}

/// Limits for FFI calls; zero means unbounded
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct FfiLimits {
    pub max_depth: usize,
    pub max_input_bytes: usize,
}

impl From<FfiLimits> for RenderConfig {
    fn from(limits: FfiLimits) -> Self {
        RenderConfig {
            max_depth: (limits.max_depth > 0).then_some(limits.max_depth),
            max_input_bytes: (limits.max_input_bytes > 0).then_some(limits.max_input_bytes),
        }
    }
}

unsafe fn read_input<'a>(content: *const c_char) -> Result<&'a str, FfiResult> {
    if content.is_null() {
        return Err(FfiResult::NullPointer);
    }
    CStr::from_ptr(content)
        .to_str()
        .map_err(|_| FfiResult::Utf8Error)
}

unsafe fn write_output(output: String, out_content: *mut *mut c_char, out_length: *mut usize) -> FfiResult {
    let output = if output.contains('\0') {
        output.replace('\0', "\u{FFFD}")
    } else {
        output
    };
    let length = output.len();
    let c_string = match CString::new(output) {
        Ok(s) => s,
        Err(_) => return FfiResult::InvalidInput,
    };

    *out_length = length;
    *out_content = c_string.into_raw();

    FfiResult::Success
}

/// Interpret a serialized document and paint it in the requested format
///
/// # Safety
/// - `content` must be a valid null-terminated UTF-8 string
/// - `out_content` and `out_length` must be valid pointers
/// - the returned string must be released with `richtext_free_string`
#[no_mangle]
pub unsafe extern "C" fn richtext_render(
    content: *const c_char,
    format: FfiFormat,
    limits: FfiLimits,
    out_content: *mut *mut c_char,
    out_length: *mut usize,
) -> FfiResult {
    if out_content.is_null() || out_length.is_null() {
        return FfiResult::NullPointer;
    }

    let input = match read_input(content) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let result = DocumentInterpreter::with_config(limits.into()).render(input);
    let output = match OutputFormat::from(format).renderer().render(&result) {
        Ok(s) => s,
        Err(_) => return FfiResult::RenderError,
    };

    write_output(output, out_content, out_length)
}

/// Collapsed preview text of a serialized document, under the same limits
/// as `richtext_render`
///
/// # Safety
/// - `content` must be a valid null-terminated UTF-8 string
/// - `out_content` and `out_length` must be valid pointers
/// - the returned string must be released with `richtext_free_string`
#[no_mangle]
pub unsafe extern "C" fn richtext_plain_text(
    content: *const c_char,
    limits: FfiLimits,
    out_content: *mut *mut c_char,
    out_length: *mut usize,
) -> FfiResult {
    if out_content.is_null() || out_length.is_null() {
        return FfiResult::NullPointer;
    }

    let input = match read_input(content) {
        Ok(s) => s,
        Err(code) => return code,
    };

    write_output(
        DocumentInterpreter::with_config(limits.into()).plain_text(input),
        out_content,
        out_length,
    )
}

/// Free a string allocated by the library
///
/// # Safety
/// - `s` must be a valid string from this library or null
#[no_mangle]
pub unsafe extern "C" fn richtext_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Get library version
///
/// # Safety
/// Returns a static string, do not free
#[no_mangle]
pub extern "C" fn richtext_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
