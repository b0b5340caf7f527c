//! Device channel abstraction for the Process Monitor debug-output driver.
//!
//! The diagnostic sink never talks to the operating system directly. It is
//! handed a [`DeviceChannel`] which knows how to open the monitor's device,
//! push one buffered control request at it, and close it again. The real
//! implementation lives in [`SystemDevice`]; tests substitute their own.

use std::fmt;
use std::io;

/// Global name of the device exposed by Process Monitor while it is capturing.
pub const PROCMON_DEVICE_PATH: &str = r"\\.\Global\ProcmonDebugLogger";

/// Device type registered by the Process Monitor driver.
pub const FILE_DEVICE_PROCMON_LOG: u32 = 0x0000_9535;

const METHOD_BUFFERED: u32 = 0;
const FILE_WRITE_ACCESS: u32 = 0x0002;

/// Builds an I/O control code the same way the Windows `CTL_CODE` macro does.
pub const fn ctl_code(device_type: u32, function: u32, method: u32, access: u32) -> u32 {
    (device_type << 16) | (access << 14) | (function << 2) | method
}

/// Control code accepted by the driver for one line of debug output.
pub const IOCTL_EXTERNAL_LOG_DEBUGOUT: u32 =
    ctl_code(FILE_DEVICE_PROCMON_LOG, 0x81, METHOD_BUFFERED, FILE_WRITE_ACCESS);

/// Error reported by a [`DeviceChannel`] when a control request fails.
#[derive(Debug)]
pub enum DeviceError {
    /// The device rejected or failed the control request.
    WriteFailed(io::Error),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::WriteFailed(err) => write!(f, "device control request failed: {}", err),
        }
    }
}

impl std::error::Error for DeviceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeviceError::WriteFailed(err) => Some(err),
        }
    }
}

/// Capability to reach a device that accepts one-way control requests.
///
/// # Contract
///
/// * `open` returns `None` when the device does not exist or cannot be opened
///   for writing. Absence is not an error.
/// * `send` issues a single synchronous request carrying `payload` as its
///   input buffer and no output buffer.
/// * `close` releases a handle obtained from `open`. It is called at most once
///   per handle.
pub trait DeviceChannel: Send + 'static {
    /// Owned handle to an opened device.
    type Handle: Send;

    fn open(&self, path: &str) -> Option<Self::Handle>;

    fn send(&self, handle: &Self::Handle, control_code: u32, payload: &[u16]) -> Result<(), DeviceError>;

    fn close(&self, handle: Self::Handle);
}

/// Encodes `text` as UTF-16 into `out`, replacing its previous contents.
///
/// NUL code units are dropped and no terminator is appended: the driver takes
/// the payload length from the request, and an embedded NUL would truncate the
/// line in the monitor's display.
pub fn encode_wide(text: &str, out: &mut Vec<u16>) {
    out.clear();
    out.extend(text.encode_utf16().filter(|&unit| unit != 0));
}

#[cfg(windows)]
pub use self::windows::SystemDevice;

#[cfg(not(windows))]
pub use self::absent::SystemDevice;

#[cfg(windows)]
mod windows {
    use super::{DeviceChannel, DeviceError};
    use std::ffi::OsStr;
    use std::io;
    use std::os::windows::ffi::OsStrExt;
    use std::ptr;
    use winapi::shared::minwindef::{DWORD, FALSE, LPVOID};
    use winapi::um::fileapi::{CreateFileW, OPEN_EXISTING};
    use winapi::um::handleapi::{CloseHandle, INVALID_HANDLE_VALUE};
    use winapi::um::ioapiset::DeviceIoControl;
    use winapi::um::winnt::{FILE_ATTRIBUTE_NORMAL, FILE_SHARE_WRITE, GENERIC_WRITE, HANDLE};

    /// Win32 implementation backed by `CreateFileW` and `DeviceIoControl`.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct SystemDevice;

    /// Kernel object handle returned by `CreateFileW`.
    pub struct DeviceHandle(HANDLE);

    // SAFETY: a file handle is a process-wide kernel reference and may be used
    // and closed from any thread.
    unsafe impl Send for DeviceHandle {}

    impl DeviceChannel for SystemDevice {
        type Handle = DeviceHandle;

        fn open(&self, path: &str) -> Option<DeviceHandle> {
            let wide_path: Vec<u16> = OsStr::new(path).encode_wide().chain(Some(0)).collect();

            let handle = unsafe {
                CreateFileW(
                    wide_path.as_ptr(),
                    GENERIC_WRITE,
                    FILE_SHARE_WRITE,
                    ptr::null_mut(),
                    OPEN_EXISTING,
                    FILE_ATTRIBUTE_NORMAL,
                    ptr::null_mut(),
                )
            };

            if handle == INVALID_HANDLE_VALUE {
                None
            } else {
                Some(DeviceHandle(handle))
            }
        }

        fn send(&self, handle: &DeviceHandle, control_code: u32, payload: &[u16]) -> Result<(), DeviceError> {
            let mut returned: DWORD = 0;
            let in_size = std::mem::size_of_val(payload) as DWORD;

            let ok = unsafe {
                DeviceIoControl(
                    handle.0,
                    control_code,
                    payload.as_ptr() as LPVOID,
                    in_size,
                    ptr::null_mut(),
                    0,
                    &mut returned,
                    ptr::null_mut(),
                )
            };

            if ok == FALSE {
                Err(DeviceError::WriteFailed(io::Error::last_os_error()))
            } else {
                Ok(())
            }
        }

        fn close(&self, handle: DeviceHandle) {
            unsafe {
                CloseHandle(handle.0);
            }
        }
    }
}

#[cfg(not(windows))]
mod absent {
    use super::{DeviceChannel, DeviceError};

    /// Stand-in for platforms without the Process Monitor driver.
    ///
    /// The device never exists here, so sinks built on it start disabled.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct SystemDevice;

    /// Uninhabited: no handle can ever be produced.
    pub enum NoHandle {}

    impl DeviceChannel for SystemDevice {
        type Handle = NoHandle;

        fn open(&self, _path: &str) -> Option<NoHandle> {
            None
        }

        fn send(&self, handle: &NoHandle, _control_code: u32, _payload: &[u16]) -> Result<(), DeviceError> {
            match *handle {}
        }

        fn close(&self, handle: NoHandle) {
            match handle {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debugout_control_code() {
        assert_eq!(IOCTL_EXTERNAL_LOG_DEBUGOUT, 0x9535_8204);
        assert_eq!(IOCTL_EXTERNAL_LOG_DEBUGOUT, 2_503_311_876);
    }

    #[test]
    fn test_encode_wide_ascii() {
        let mut out = Vec::new();
        encode_wide("abc", &mut out);
        assert_eq!(out, vec![b'a' as u16, b'b' as u16, b'c' as u16]);
    }

    #[test]
    fn test_encode_wide_surrogates_and_nul() {
        let mut out = vec![1, 2, 3];
        encode_wide("a\0\u{1F30D}", &mut out);
        assert_eq!(out, vec![b'a' as u16, 0xD83C, 0xDF0D]);
    }

    #[test]
    fn test_system_device_open_missing_path() {
        // Nothing on any test machine answers to this name.
        assert!(SystemDevice.open(r"\\.\Global\NoSuchDebugLogger-procmon-logbench").is_none());
    }
}
