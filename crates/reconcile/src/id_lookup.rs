//! UID/GID lookups against the system user and group databases.
//!
//! Every lookup uses the reentrant `get*_r` family so concurrent callers do
//! not share libc's static result buffers. Scratch space starts at 4 KiB and
//! doubles on `ERANGE` up to 1 MiB.

#![allow(unsafe_code)]

use std::ffi::{CStr, CString};
use std::io;
use std::mem::MaybeUninit;
use std::ptr;

use crate::service::{RawGid, RawUid};

const INITIAL_BUFFER_LEN: usize = 4096;
const MAX_BUFFER_LEN: usize = 1024 * 1024;

/// Runs `call` with a growing scratch buffer.
///
/// `call` returns the libc status code together with the extracted value.
fn lookup_with_buffer<T>(
    mut call: impl FnMut(&mut [u8]) -> (libc::c_int, Option<T>),
) -> io::Result<Option<T>> {
    let mut buffer = vec![0_u8; INITIAL_BUFFER_LEN];
    loop {
        let (errno, value) = call(&mut buffer);
        match errno {
            0 => return Ok(value),
            libc::ERANGE => {
                if buffer.len() >= MAX_BUFFER_LEN {
                    return Err(io::Error::new(
                        io::ErrorKind::OutOfMemory,
                        "identity database record too large",
                    ));
                }
                let len = buffer.len().saturating_mul(2);
                buffer.resize(len, 0);
            }
            // Some NSS modules report a missing entry via errno.
            libc::ENOENT | libc::ESRCH => return Ok(None),
            errno => return Err(io::Error::from_raw_os_error(errno)),
        }
    }
}

fn owned_name(name: *const libc::c_char) -> String {
    // SAFETY: callers pass a non-null, NUL-terminated string that lives in the
    // scratch buffer for the duration of this call.
    unsafe { CStr::from_ptr(name) }
        .to_string_lossy()
        .into_owned()
}

/// Looks up the username for a given UID.
pub fn lookup_user_name(uid: RawUid) -> io::Result<Option<String>> {
    lookup_with_buffer(|buffer| {
        let mut pwd = MaybeUninit::<libc::passwd>::zeroed();
        let mut result: *mut libc::passwd = ptr::null_mut();
        // SAFETY: `pwd`, `buffer` and `result` are valid for writes and outlive
        // the call; the buffer length passed matches its allocation.
        let errno = unsafe {
            libc::getpwuid_r(
                uid,
                pwd.as_mut_ptr(),
                buffer.as_mut_ptr().cast::<libc::c_char>(),
                buffer.len(),
                &mut result,
            )
        };
        if errno != 0 || result.is_null() {
            return (errno, None);
        }
        // SAFETY: a non-null `result` means getpwuid_r initialised `pwd`.
        let pwd = unsafe { pwd.assume_init() };
        (0, Some(owned_name(pwd.pw_name)))
    })
}

/// Looks up the UID for a given username.
///
/// Names containing an interior NUL cannot exist in the database and yield
/// `Ok(None)`.
pub fn lookup_user_by_name(name: &str) -> io::Result<Option<RawUid>> {
    let Ok(c_name) = CString::new(name) else {
        return Ok(None);
    };
    lookup_with_buffer(|buffer| {
        let mut pwd = MaybeUninit::<libc::passwd>::zeroed();
        let mut result: *mut libc::passwd = ptr::null_mut();
        // SAFETY: as in `lookup_user_name`; `c_name` is a valid C string.
        let errno = unsafe {
            libc::getpwnam_r(
                c_name.as_ptr(),
                pwd.as_mut_ptr(),
                buffer.as_mut_ptr().cast::<libc::c_char>(),
                buffer.len(),
                &mut result,
            )
        };
        if errno != 0 || result.is_null() {
            return (errno, None);
        }
        // SAFETY: a non-null `result` means getpwnam_r initialised `pwd`.
        let pwd = unsafe { pwd.assume_init() };
        (0, Some(pwd.pw_uid))
    })
}

/// Looks up the group name for a given GID.
pub fn lookup_group_name(gid: RawGid) -> io::Result<Option<String>> {
    lookup_with_buffer(|buffer| {
        let mut grp = MaybeUninit::<libc::group>::zeroed();
        let mut result: *mut libc::group = ptr::null_mut();
        // SAFETY: all pointers are valid for writes and outlive the call.
        let errno = unsafe {
            libc::getgrgid_r(
                gid,
                grp.as_mut_ptr(),
                buffer.as_mut_ptr().cast::<libc::c_char>(),
                buffer.len(),
                &mut result,
            )
        };
        if errno != 0 || result.is_null() {
            return (errno, None);
        }
        // SAFETY: a non-null `result` means getgrgid_r initialised `grp`.
        let grp = unsafe { grp.assume_init() };
        (0, Some(owned_name(grp.gr_name)))
    })
}

/// Looks up the GID for a given group name.
pub fn lookup_group_by_name(name: &str) -> io::Result<Option<RawGid>> {
    let Ok(c_name) = CString::new(name) else {
        return Ok(None);
    };
    lookup_with_buffer(|buffer| {
        let mut grp = MaybeUninit::<libc::group>::zeroed();
        let mut result: *mut libc::group = ptr::null_mut();
        // SAFETY: all pointers are valid for writes and outlive the call.
        let errno = unsafe {
            libc::getgrnam_r(
                c_name.as_ptr(),
                grp.as_mut_ptr(),
                buffer.as_mut_ptr().cast::<libc::c_char>(),
                buffer.len(),
                &mut result,
            )
        };
        if errno != 0 || result.is_null() {
            return (errno, None);
        }
        // SAFETY: a non-null `result` means getgrnam_r initialised `grp`.
        let grp = unsafe { grp.assume_init() };
        (0, Some(grp.gr_gid))
    })
}
