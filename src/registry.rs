//! String-value helpers over an already-open registry key.

use winreg::RegKey;

/// Read the named string value into a caller-owned byte buffer.
///
/// `*value_size` is the buffer capacity in characters, counting the
/// terminating NUL; on entry the buffer is reset to the empty string so
/// every failure path reads as `""`. Returns `false` when the value is
/// missing, has the wrong type, or cannot be read. When the stored value
/// is longer than the capacity, the required length is written back
/// through `value_size` and `false` is returned without copying, so the
/// caller can retry with a larger buffer.
///
/// On success the buffer holds a NUL-terminated copy of the value. A
/// value whose length equals the capacity exactly is copied with its
/// last character replaced by the terminator.
pub fn read_string_value(
    key: &RegKey,
    name: &str,
    value: &mut [u8],
    value_size: &mut usize,
) -> bool {
    if value.is_empty() || *value_size == 0 {
        return false;
    }
    value[0] = 0;

    let text: String = match key.get_value(name) {
        Ok(text) => text,
        Err(_) => return false,
    };

    // Capacity is measured in characters of the stored wide value.
    let stored_len = text.encode_utf16().count();
    if stored_len > *value_size {
        *value_size = stored_len;
        return false;
    }

    // Stored values are ASCII by contract, so the UTF-8 bytes are the
    // narrow form.
    let cap = (*value_size).min(value.len());
    let bytes = text.as_bytes();
    let copied = bytes.len().min(cap);
    value[..copied].copy_from_slice(&bytes[..copied]);
    value[copied.min(cap - 1)] = 0;
    true
}

/// Write `value` under `name` as a wide string value.
///
/// Returns whether the underlying registry write succeeded. The key must
/// have been opened with write access.
pub fn write_string_value(key: &RegKey, name: &str, value: &str) -> bool {
    key.set_value(name, &value).is_ok()
}
