//! C FFI boundary for tabstats
//!
//! A JSON analysis request goes in, a JSON report comes out. Returned strings
//! are allocated with `malloc` and must be released with
//! [`tabstats_free_string`].

mod types;

pub use types::*;

use std::ffi::CStr;

use libc::c_char;
use log::{debug, warn};
use tabstats_core::{run_analysis, AnalysisRequest, StatsError};

/// Convert StatsError to ErrorCode
fn error_to_code(err: &StatsError) -> ErrorCode {
    match err {
        StatsError::InvalidInput(_) => ErrorCode::InvalidInput,
        StatsError::MalformedRow { .. } => ErrorCode::MalformedRow,
        StatsError::SerializationError(_) => ErrorCode::SerializationError,
    }
}

/// Helper to allocate and copy a string
unsafe fn alloc_string(s: &str) -> *mut c_char {
    let len = s.len() + 1;
    let ptr = libc::malloc(len) as *mut c_char;
    if !ptr.is_null() {
        std::ptr::copy_nonoverlapping(s.as_ptr(), ptr as *mut u8, s.len());
        *ptr.add(s.len()) = 0;
    }
    ptr
}

fn analyze_json(request_json: &str) -> Result<String, StatsError> {
    let request = AnalysisRequest::from_json(request_json)?;
    debug!(
        "analysis request: {} rows, x={:?}, y={:?}, chart={:?}",
        request.records.len(),
        request.x_column,
        request.y_column,
        request.chart_type
    );
    run_analysis(&request).to_json()
}

/// Analyze a JSON request and return the JSON report
///
/// # Safety
/// - `request_json` must be a valid NUL-terminated string
/// - `out_report` must be a valid pointer; on success it receives a string
///   that must be released with `tabstats_free_string`
/// - `out_error` can be NULL if not needed
///
/// # Returns
/// `true` on success, `false` on error (check `out_error` for details)
#[no_mangle]
pub unsafe extern "C" fn tabstats_analyze(
    request_json: *const c_char,
    out_report: *mut *mut c_char,
    out_error: *mut TabstatsError,
) -> bool {
    if !out_error.is_null() {
        *out_error = TabstatsError::success();
    }

    if request_json.is_null() || out_report.is_null() {
        if !out_error.is_null() {
            (*out_error).set(ErrorCode::InvalidInput, "request_json or out_report is NULL");
        }
        return false;
    }
    *out_report = std::ptr::null_mut();

    let request = match CStr::from_ptr(request_json).to_str() {
        Ok(s) => s,
        Err(_) => {
            if !out_error.is_null() {
                (*out_error).set(ErrorCode::InvalidInput, "request_json is not valid UTF-8");
            }
            return false;
        }
    };

    let result = std::panic::catch_unwind(|| analyze_json(request));

    let report = match result {
        Ok(Ok(report)) => report,
        Ok(Err(e)) => {
            warn!("analysis request rejected: {}", e);
            if !out_error.is_null() {
                (*out_error).set(error_to_code(&e), &e.to_string());
            }
            return false;
        }
        Err(_) => {
            warn!("internal panic during analysis");
            if !out_error.is_null() {
                (*out_error).set(ErrorCode::InternalError, "Internal panic in analysis");
            }
            return false;
        }
    };

    let ptr = alloc_string(&report);
    if ptr.is_null() {
        if !out_error.is_null() {
            (*out_error).set(ErrorCode::AllocationFailure, "Failed to allocate report");
        }
        return false;
    }
    *out_report = ptr;
    true
}

/// Free a string returned by this library
///
/// # Safety
/// `ptr` must be NULL or a pointer previously returned through `out_report`
#[no_mangle]
pub unsafe extern "C" fn tabstats_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        libc::free(ptr as *mut libc::c_void);
    }
}

/// Get library version string
#[no_mangle]
pub extern "C" fn tabstats_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}
