//! Windows version query via ntdll.

#[repr(C)]
struct OsVersionInfo {
    size: u32,
    major: u32,
    minor: u32,
    build: u32,
    platform_id: u32,
    csd_version: [u16; 128],
}

#[link(name = "ntdll")]
extern "system" {
    fn RtlGetVersion(info: *mut OsVersionInfo) -> i32;
}

/// Query the running Windows version as `(major, minor, build)`.
#[must_use]
pub fn windows_version() -> Option<(u32, u32, u32)> {
    let mut info = OsVersionInfo {
        size: std::mem::size_of::<OsVersionInfo>() as u32,
        major: 0,
        minor: 0,
        build: 0,
        platform_id: 0,
        csd_version: [0u16; 128],
    };

    let status = unsafe { RtlGetVersion(&raw mut info) };
    (status == 0).then_some((info.major, info.minor, info.build))
}

/// Check if this OS enforces mandatory integrity levels (Vista and
/// later). An unanswerable version query reads as a modern OS.
#[must_use]
pub fn enforces_integrity_levels() -> bool {
    match windows_version() {
        Some((major, _, _)) => major >= 6,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_query_answers() {
        let (major, _minor, _build) = windows_version().expect("query version");
        assert!(major >= 6);
    }
}
