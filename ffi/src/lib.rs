//! C-ABI wrapper around `todolist-core`.
//!
//! # Overview
//! Exposes the todo list API through `extern "C"` functions so any language
//! with a C FFI can build and parse HTTP requests/responses without linking
//! to Rust's async runtime or serde directly. The header is generated into
//! `include/todolist.h` by the build script.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `build_*` / `parse_*` mirrors the core API 1:1.
//! - A single `FfiTodoResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `todo_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use todolist_core::http::HttpResponse;
use todolist_core::types::NewTodo;

use types::*;

/// Read a borrowed C string, treating invalid UTF-8 as empty.
///
/// # Safety
/// `s` must be non-null and point to a NUL-terminated string.
unsafe fn read_c_str<'a>(s: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(s) }.to_str().unwrap_or("")
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `TodoClient` bound to `base_url`.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `todo_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_client_new(base_url: *const c_char) -> *mut FfiTodoClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let url = unsafe { read_c_str(base_url) };
        let client = todolist_core::TodoClient::new(url);
        Box::into_raw(Box::new(FfiTodoClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a `TodoClient` created by `todo_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_client_free(client: *mut FfiTodoClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build an HTTP request listing the todos of `user_id`.
///
/// Returns null if `client` is null.
/// The caller must free the returned pointer with `todo_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_build_list_todos(
    client: *const FfiTodoClient,
    user_id: u64,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_list_todos(user_id))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build an HTTP request creating a todo owned by `user_id`.
///
/// The title is sent as given; trimming and the empty-title check are the
/// caller's job. Returns null if `client` or `title` is null, or if
/// serialization fails.
#[unsafe(no_mangle)]
pub extern "C" fn todo_build_create_todo(
    client: *const FfiTodoClient,
    user_id: u64,
    title: *const c_char,
    completed: bool,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || title.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let input = NewTodo {
            user_id,
            title: unsafe { read_c_str(title) }.to_string(),
            completed,
        };
        match client.inner.build_create_todo(&input) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build an HTTP request deleting the todo `id`.
///
/// Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_build_delete_todo(
    client: *const FfiTodoClient,
    id: u64,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_delete_todo(id))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body is
/// read as the empty string.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { read_c_str(resp.body) }.to_string()
    };
    HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body,
    }
}

/// Shared null checks and conversion for every `todo_parse_*` function.
fn parse_with<F>(
    client: *const FfiTodoClient,
    response: *const FfiHttpResponse,
    name: &str,
    parse: F,
) -> *mut FfiTodoResult
where
    F: FnOnce(&todolist_core::TodoClient, HttpResponse) -> *mut FfiTodoResult
        + std::panic::UnwindSafe,
{
    catch_unwind(|| {
        if client.is_null() {
            return FfiTodoResult::null_arg("client");
        }
        if response.is_null() {
            return FfiTodoResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        parse(&client.inner, ffi_response_to_core(resp))
    })
    .unwrap_or_else(|_| FfiTodoResult::panic(&format!("panic in {name}")))
}

/// Parse an HTTP response from a list-todos request.
///
/// Returns a result with `data_tag = TodoList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn todo_parse_list_todos(
    client: *const FfiTodoClient,
    response: *const FfiHttpResponse,
) -> *mut FfiTodoResult {
    parse_with(client, response, "todo_parse_list_todos", |client, resp| {
        match client.parse_list_todos(resp) {
            Ok(todos) => FfiTodoResult::ok_todo_list(todos),
            Err(e) => FfiTodoResult::from_error(e),
        }
    })
}

/// Parse an HTTP response from a create-todo request.
///
/// Returns a result with `data_tag = Todo` on success (any 2xx status).
#[unsafe(no_mangle)]
pub extern "C" fn todo_parse_create_todo(
    client: *const FfiTodoClient,
    response: *const FfiHttpResponse,
) -> *mut FfiTodoResult {
    parse_with(client, response, "todo_parse_create_todo", |client, resp| {
        match client.parse_create_todo(resp) {
            Ok(todo) => FfiTodoResult::ok_todo(todo),
            Err(e) => FfiTodoResult::from_error(e),
        }
    })
}

/// Parse an HTTP response from a delete-todo request.
///
/// Returns a result with `data_tag = None` on success.
#[unsafe(no_mangle)]
pub extern "C" fn todo_parse_delete_todo(
    client: *const FfiTodoClient,
    response: *const FfiHttpResponse,
) -> *mut FfiTodoResult {
    parse_with(client, response, "todo_parse_delete_todo", |client, resp| {
        match client.parse_delete_todo(resp) {
            Ok(()) => FfiTodoResult::ok_empty(),
            Err(e) => FfiTodoResult::from_error(e),
        }
    })
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `todo_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.path.is_null() {
            drop(unsafe { CString::from_raw(req.path) });
        }
        if !req.body.is_null() {
            drop(unsafe { CString::from_raw(req.body) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free an `FfiTodoResult` returned by any `todo_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_result(result: *mut FfiTodoResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::Todo => {
                let todo = unsafe { Box::from_raw(result.data as *mut FfiTodo) };
                free_ffi_todo_fields(&todo);
            }
            FfiDataTag::TodoList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiTodoList) };
                if !list.items.is_null() && list.len > 0 {
                    let items = unsafe {
                        Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                            list.items,
                            list.len as usize,
                        ))
                    };
                    for item in items.iter() {
                        free_ffi_todo_fields(item);
                    }
                }
            }
            FfiDataTag::None => {}
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn new_client() -> *mut FfiTodoClient {
        let url = CString::new("http://localhost:3000").unwrap();
        todo_client_new(url.as_ptr())
    }

    fn c_str<'a>(s: *const c_char) -> &'a str {
        unsafe { CStr::from_ptr(s) }.to_str().unwrap()
    }

    #[test]
    fn client_new_and_free() {
        let client = new_client();
        assert!(!client.is_null());
        todo_client_free(client);
    }

    #[test]
    fn client_new_null_returns_null() {
        let client = todo_client_new(std::ptr::null());
        assert!(client.is_null());
    }

    #[test]
    fn client_free_null_is_safe() {
        todo_client_free(std::ptr::null_mut());
    }

    #[test]
    fn build_list_todos_scopes_by_owner() {
        let client = new_client();
        let req = todo_build_list_todos(client, 1229);
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert!(matches!(req_ref.method, FfiHttpMethod::Get));
        assert_eq!(c_str(req_ref.path), "http://localhost:3000/todos?userId=1229");
        assert!(req_ref.body.is_null());
        assert_eq!(req_ref.headers_len, 0);

        todo_free_request(req);
        todo_client_free(client);
    }

    #[test]
    fn build_list_todos_null_client_returns_null() {
        let req = todo_build_list_todos(std::ptr::null(), 1);
        assert!(req.is_null());
    }

    #[test]
    fn build_create_todo_produces_post_with_json_body() {
        let client = new_client();
        let title = CString::new("Buy milk").unwrap();
        let req = todo_build_create_todo(client, 1229, title.as_ptr(), false);
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert!(matches!(req_ref.method, FfiHttpMethod::Post));
        assert_eq!(req_ref.headers_len, 1);
        let header = unsafe { &*req_ref.headers };
        assert_eq!(c_str(header.key), "content-type");
        assert_eq!(c_str(header.value), "application/json");

        let body: serde_json::Value = serde_json::from_str(c_str(req_ref.body)).unwrap();
        assert_eq!(body["userId"], 1229);
        assert_eq!(body["title"], "Buy milk");
        assert_eq!(body["completed"], false);

        todo_free_request(req);
        todo_client_free(client);
    }

    #[test]
    fn build_create_todo_null_title_returns_null() {
        let client = new_client();
        let req = todo_build_create_todo(client, 1229, std::ptr::null(), false);
        assert!(req.is_null());
        todo_client_free(client);
    }

    #[test]
    fn build_delete_todo_targets_id() {
        let client = new_client();
        let req = todo_build_delete_todo(client, 42);
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert!(matches!(req_ref.method, FfiHttpMethod::Delete));
        assert_eq!(c_str(req_ref.path), "http://localhost:3000/todos/42");

        todo_free_request(req);
        todo_client_free(client);
    }

    #[test]
    fn parse_list_todos_empty() {
        let client = new_client();
        let body = CString::new("[]").unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = todo_parse_list_todos(client, &resp);
        assert!(!result.is_null());

        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert!(r.error_message.is_null());
        assert_eq!(r.data_tag, FfiDataTag::TodoList);

        let list = unsafe { &*(r.data as *const FfiTodoList) };
        assert_eq!(list.len, 0);
        assert!(list.items.is_null());

        todo_free_result(result);
        todo_client_free(client);
    }

    #[test]
    fn parse_list_todos_two_items() {
        let client = new_client();
        let body = CString::new(
            r#"[
                {"id":1,"userId":1229,"title":"First","completed":false},
                {"id":2,"userId":1229,"title":"Second","completed":true}
            ]"#,
        )
        .unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = todo_parse_list_todos(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert_eq!(r.data_tag, FfiDataTag::TodoList);

        let list = unsafe { &*(r.data as *const FfiTodoList) };
        assert_eq!(list.len, 2);

        let items = unsafe { std::slice::from_raw_parts(list.items, list.len as usize) };
        assert_eq!(items[0].id, 1);
        assert_eq!(items[0].user_id, 1229);
        assert_eq!(c_str(items[0].title), "First");
        assert!(!items[0].completed);

        assert_eq!(items[1].id, 2);
        assert_eq!(c_str(items[1].title), "Second");
        assert!(items[1].completed);

        todo_free_result(result);
        todo_client_free(client);
    }

    #[test]
    fn parse_list_todos_null_body_is_deserialization_error() {
        let client = new_client();
        let resp = FfiHttpResponse {
            status: 200,
            body: std::ptr::null(),
        };
        let result = todo_parse_list_todos(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Deserialization);
        assert!(r.data.is_null());

        todo_free_result(result);
        todo_client_free(client);
    }

    #[test]
    fn parse_create_todo_success() {
        let client = new_client();
        let body =
            CString::new(r#"{"id":7,"userId":1229,"title":"New","completed":false}"#).unwrap();
        let resp = FfiHttpResponse {
            status: 201,
            body: body.as_ptr(),
        };
        let result = todo_parse_create_todo(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert_eq!(r.data_tag, FfiDataTag::Todo);

        let todo = unsafe { &*(r.data as *const FfiTodo) };
        assert_eq!(todo.id, 7);
        assert_eq!(c_str(todo.title), "New");

        todo_free_result(result);
        todo_client_free(client);
    }

    #[test]
    fn parse_create_todo_server_error_carries_status() {
        let client = new_client();
        let body = CString::new("boom").unwrap();
        let resp = FfiHttpResponse {
            status: 500,
            body: body.as_ptr(),
        };
        let result = todo_parse_create_todo(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Http);
        assert_eq!(r.http_status, 500);
        assert_eq!(c_str(r.error_message), "HTTP 500: boom");

        todo_free_result(result);
        todo_client_free(client);
    }

    #[test]
    fn parse_delete_todo_success() {
        let client = new_client();
        let body = CString::new("").unwrap();
        let resp = FfiHttpResponse {
            status: 204,
            body: body.as_ptr(),
        };
        let result = todo_parse_delete_todo(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert_eq!(r.data_tag, FfiDataTag::None);
        assert!(r.data.is_null());

        todo_free_result(result);
        todo_client_free(client);
    }

    #[test]
    fn parse_delete_todo_not_found() {
        let client = new_client();
        let body = CString::new("").unwrap();
        let resp = FfiHttpResponse {
            status: 404,
            body: body.as_ptr(),
        };
        let result = todo_parse_delete_todo(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::NotFound);
        assert_eq!(r.http_status, 404);
        assert!(!r.error_message.is_null());

        todo_free_result(result);
        todo_client_free(client);
    }

    #[test]
    fn parse_null_client_returns_null_arg() {
        let body = CString::new("[]").unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = todo_parse_list_todos(std::ptr::null(), &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::NullArg);
        assert_eq!(c_str(r.error_message), "null argument: client");

        todo_free_result(result);
    }

    #[test]
    fn parse_null_response_returns_null_arg() {
        let client = new_client();
        let result = todo_parse_delete_todo(client, std::ptr::null());
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::NullArg);

        todo_free_result(result);
        todo_client_free(client);
    }

    #[test]
    fn free_request_null_is_safe() {
        todo_free_request(std::ptr::null_mut());
    }

    #[test]
    fn free_result_null_is_safe() {
        todo_free_result(std::ptr::null_mut());
    }

    #[test]
    fn free_string_null_is_safe() {
        todo_free_string(std::ptr::null_mut());
    }
}
