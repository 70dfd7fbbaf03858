//! FFI bindings for baby-records
//!
//! This module provides C-compatible functions for calling the taxonomy from
//! mobile hosts. All functions use C strings (null-terminated) and return
//! allocated memory that must be freed by the caller using `records_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use chrono::NaiveDateTime;

use crate::draft::RecordDraft;
use crate::error::TaxonomyError;
use crate::formatter::format_raw_attributes;
use crate::schema::{parse_date, RecordRowAdapter};
use crate::taxonomy::{group_of, info_of_name, pickable_types, RECORD_TYPE_GROUPS};
use crate::timeline::{timeline_from_rows, RecordFilter};
use crate::types::RecordType;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Required string argument; records an error naming the argument when missing
unsafe fn required_arg(ptr: *const c_char, name: &str) -> Option<String> {
    let value = cstr_to_string(ptr);
    if value.is_none() {
        set_last_error(&format!("Invalid {} string pointer", name));
    }
    value
}

/// Hand a computed string to the caller, or record the error and return NULL
fn into_c_result(result: Result<String, TaxonomyError>) -> *mut c_char {
    match result {
        Ok(s) => string_to_cstr(&s),
        Err(e) => {
            set_last_error(&format!("{}: {}", e.code(), e));
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Taxonomy
// ============================================================================

/// Group name of a record type (`growth`, `sleep`, `feeding`, `diaper`).
///
/// # Safety
/// - `record_type` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `records_free_string`.
/// - Returns NULL on error; call `records_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn records_group_of(record_type: *const c_char) -> *mut c_char {
    clear_last_error();

    let Some(type_str) = required_arg(record_type, "record_type") else {
        return ptr::null_mut();
    };

    into_c_result(
        type_str
            .parse::<RecordType>()
            .map(|t| group_of(t).as_str().to_string()),
    )
}

/// Metadata of a record type as JSON
/// (`{type, title, color, icon, attributes, pickable}`).
///
/// # Safety
/// - `record_type` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `records_free_string`.
/// - Returns NULL on error; call `records_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn records_type_info(record_type: *const c_char) -> *mut c_char {
    clear_last_error();

    let Some(type_str) = required_arg(record_type, "record_type") else {
        return ptr::null_mut();
    };

    into_c_result(
        info_of_name(&type_str).and_then(|info| serde_json::to_string(info).map_err(Into::into)),
    )
}

/// The group table as a JSON array of `{group, types, pickable}`.
///
/// # Safety
/// - Returns a newly allocated string that must be freed with `records_free_string`.
#[no_mangle]
pub unsafe extern "C" fn records_type_groups() -> *mut c_char {
    clear_last_error();

    let groups: Vec<serde_json::Value> = RECORD_TYPE_GROUPS
        .iter()
        .map(|(group, types)| {
            serde_json::json!({
                "group": group,
                "types": types,
                "pickable": pickable_types(*group),
            })
        })
        .collect();

    into_c_result(serde_json::to_string(&groups).map_err(Into::into))
}

// ============================================================================
// Formatting
// ============================================================================

/// One-line summary of a record's attributes.
///
/// # Safety
/// - `record_type` and `attributes_json` must be valid null-terminated C strings.
/// - `date` (YYYY-MM-DD) and `time` (HH:MM:SS) may be NULL.
/// - Returns a newly allocated string that must be freed with `records_free_string`.
/// - Returns NULL on error; call `records_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn records_format_attributes(
    record_type: *const c_char,
    attributes_json: *const c_char,
    date: *const c_char,
    time: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(type_str) = required_arg(record_type, "record_type") else {
        return ptr::null_mut();
    };
    let Some(attributes_str) = required_arg(attributes_json, "attributes") else {
        return ptr::null_mut();
    };
    let date_str = cstr_to_string(date);
    let time_str = cstr_to_string(time);

    into_c_result(
        serde_json::from_str::<serde_json::Value>(&attributes_str)
            .map_err(TaxonomyError::from)
            .and_then(|attributes| {
                format_raw_attributes(
                    &type_str,
                    &attributes,
                    date_str.as_deref(),
                    time_str.as_deref(),
                )
            }),
    )
}

/// Build the records timeline from a JSON array of record rows.
///
/// Returns `{"sections": [...], "rejected": [{index, id, code, message}]}`;
/// rows that fail validation are listed under `rejected` instead of shown.
///
/// # Safety
/// - `rows_json` and `today` (YYYY-MM-DD) must be valid null-terminated C strings.
/// - `filter_json` (`{baby_profile_id, record_types}`) may be NULL to keep every record.
/// - Returns a newly allocated string that must be freed with `records_free_string`.
/// - Returns NULL on error; call `records_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn records_timeline(
    rows_json: *const c_char,
    filter_json: *const c_char,
    today: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(rows_str) = required_arg(rows_json, "rows") else {
        return ptr::null_mut();
    };
    let Some(today_str) = required_arg(today, "today") else {
        return ptr::null_mut();
    };
    let filter_str = cstr_to_string(filter_json);

    let result = (|| -> Result<String, TaxonomyError> {
        let today = parse_date(&today_str)?;
        let filter: RecordFilter = match filter_str {
            Some(s) => serde_json::from_str(&s)?,
            None => RecordFilter::default(),
        };
        let rows = RecordRowAdapter::parse_array(&rows_str)?;
        let report = timeline_from_rows(rows, &filter, today)?;
        Ok(serde_json::to_string(&report)?)
    })();

    into_c_result(result)
}

// ============================================================================
// Drafts
// ============================================================================

/// Seed a draft for a new record as JSON.
///
/// # Safety
/// - `record_type` and `now` (YYYY-MM-DDTHH:MM:SS, local time) must be valid
///   null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `records_free_string`.
/// - Returns NULL on error; call `records_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn records_draft(
    record_type: *const c_char,
    baby_profile_id: i64,
    now: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(type_str) = required_arg(record_type, "record_type") else {
        return ptr::null_mut();
    };
    let Some(now_str) = required_arg(now, "now") else {
        return ptr::null_mut();
    };

    let result = (|| -> Result<String, TaxonomyError> {
        let record_type: RecordType = type_str.parse()?;
        let now = NaiveDateTime::parse_from_str(&now_str, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|e| TaxonomyError::DateParse(format!("invalid timestamp '{}': {}", now_str, e)))?;
        let draft = RecordDraft::new(record_type, baby_profile_id, now);
        Ok(serde_json::to_string(&draft)?)
    })();

    into_c_result(result)
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by a `records_*` function.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a `records_*` function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn records_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message, prefixed with its error code.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next `records_*` call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn records_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn records_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::ffi::CString;

    unsafe fn take_string(ptr: *mut c_char) -> String {
        assert!(!ptr.is_null(), "unexpected error: {:?}", last_error());
        let s = CStr::from_ptr(ptr).to_str().unwrap().to_string();
        records_free_string(ptr);
        s
    }

    fn last_error() -> Option<String> {
        unsafe {
            let err = records_last_error();
            if err.is_null() {
                None
            } else {
                Some(CStr::from_ptr(err).to_str().unwrap().to_string())
            }
        }
    }

    #[test]
    fn test_ffi_group_and_info() {
        let weight = CString::new("weight").unwrap();
        unsafe {
            assert_eq!(take_string(records_group_of(weight.as_ptr())), "growth");

            let info: serde_json::Value =
                serde_json::from_str(&take_string(records_type_info(weight.as_ptr()))).unwrap();
            assert_eq!(info["title"], "Weight");
            assert_eq!(info["attributes"], serde_json::json!({ "unit": "kg", "value": 3.5 }));
            assert_eq!(info["icon"], "assets/icon-weight.png");
        }
    }

    #[test]
    fn test_ffi_type_groups() {
        unsafe {
            let groups: serde_json::Value =
                serde_json::from_str(&take_string(records_type_groups())).unwrap();
            assert_eq!(groups[0]["group"], "feeding");
            assert_eq!(groups[1]["pickable"], serde_json::json!(["sleepDay", "sleepNight"]));
        }
    }

    #[test]
    fn test_ffi_format_attributes() {
        let sleep = CString::new("sleepNight").unwrap();
        let attributes = CString::new(r#"{"endDate":"2024-01-01","endTime":"20:45:00"}"#).unwrap();
        let date = CString::new("2024-01-01").unwrap();
        let time = CString::new("20:00:00").unwrap();

        unsafe {
            let summary = take_string(records_format_attributes(
                sleep.as_ptr(),
                attributes.as_ptr(),
                date.as_ptr(),
                time.as_ptr(),
            ));
            assert_eq!(summary, "Duration: 45 minutes");
        }
    }

    #[test]
    fn test_ffi_timeline() {
        let rows = CString::new(
            r#"[
                {"id":1,"baby_profile_id":1,"type":"weight","date":"2024-01-01","time":"09:00:00","attributes":{"value":3.5,"unit":"kg"}},
                {"id":2,"baby_profile_id":1,"type":"mystery","date":"2024-01-01","time":"10:00:00","attributes":{}}
            ]"#,
        )
        .unwrap();
        let today = CString::new("2024-01-01").unwrap();

        unsafe {
            let timeline: serde_json::Value = serde_json::from_str(&take_string(records_timeline(
                rows.as_ptr(),
                ptr::null(),
                today.as_ptr(),
            )))
            .unwrap();

            let sections = &timeline["sections"];
            assert_eq!(sections[0]["title"], "Today");
            assert_eq!(sections[0]["data"].as_array().unwrap().len(), 1);
            assert_eq!(sections[0]["data"][0]["summary"], "3.5kg");

            assert_eq!(
                timeline["rejected"],
                serde_json::json!([{
                    "index": 1,
                    "id": 2,
                    "code": "UNKNOWN_RECORD_TYPE",
                    "message": "Unknown record type: mystery",
                }])
            );
        }
    }

    #[test]
    fn test_ffi_draft() {
        let diaper = CString::new("diaper").unwrap();
        let now = CString::new("2024-01-01T07:05:09").unwrap();

        unsafe {
            let draft: serde_json::Value =
                serde_json::from_str(&take_string(records_draft(diaper.as_ptr(), 4, now.as_ptr())))
                    .unwrap();
            assert_eq!(draft["type"], "diaper");
            assert_eq!(draft["time"], "07:05:09");
            assert_eq!(draft["attributes"], serde_json::json!({}));
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        let unknown = CString::new("tummyTime").unwrap();

        unsafe {
            let result = records_type_info(unknown.as_ptr());
            assert!(result.is_null());

            let error = last_error().unwrap();
            assert!(error.starts_with("UNKNOWN_RECORD_TYPE"));

            assert!(records_group_of(ptr::null()).is_null());
            assert_eq!(last_error().unwrap(), "Invalid record_type string pointer");
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = records_version();
            assert!(!version.is_null());

            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert!(!version_str.is_empty());
        }
    }
}
