//! Process identity queries - token owner and integrity level.

use crate::error::{Result, UserHiveError};
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::Security::{
    GetSidSubAuthority, GetSidSubAuthorityCount, GetTokenInformation, IsWellKnownSid,
    TokenIntegrityLevel, TokenUser, WinLocalSystemSid, TOKEN_INFORMATION_CLASS,
    TOKEN_MANDATORY_LABEL, TOKEN_QUERY, TOKEN_USER,
};
use windows::Win32::System::SystemServices::{
    SECURITY_MANDATORY_HIGH_RID, SECURITY_MANDATORY_LOW_RID, SECURITY_MANDATORY_MEDIUM_RID,
    SECURITY_MANDATORY_SYSTEM_RID,
};
use windows::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

/// Mandatory integrity level of a process, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IntegrityLevel {
    Untrusted,
    Low,
    Medium,
    High,
    System,
}

impl IntegrityLevel {
    fn from_rid(rid: u32) -> Self {
        if rid < SECURITY_MANDATORY_LOW_RID as u32 {
            Self::Untrusted
        } else if rid < SECURITY_MANDATORY_MEDIUM_RID as u32 {
            Self::Low
        } else if rid < SECURITY_MANDATORY_HIGH_RID as u32 {
            Self::Medium
        } else if rid < SECURITY_MANDATORY_SYSTEM_RID as u32 {
            Self::High
        } else {
            Self::System
        }
    }
}

struct TokenHandle(HANDLE);

impl Drop for TokenHandle {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

fn open_query_token() -> Result<TokenHandle> {
    unsafe {
        let mut token = HANDLE::default();
        OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &raw mut token)
            .map_err(|e| UserHiveError::TokenQueryFailed(format!("OpenProcessToken: {e}")))?;
        Ok(TokenHandle(token))
    }
}

fn token_information(token: &TokenHandle, class: TOKEN_INFORMATION_CLASS) -> Result<Vec<u8>> {
    unsafe {
        let mut needed = 0u32;
        let _ = GetTokenInformation(token.0, class, None, 0, &raw mut needed);

        let mut buffer = vec![0u8; needed as usize];
        GetTokenInformation(
            token.0,
            class,
            Some(buffer.as_mut_ptr().cast()),
            needed,
            &raw mut needed,
        )
        .map_err(|e| UserHiveError::TokenQueryFailed(format!("GetTokenInformation: {e}")))?;
        Ok(buffer)
    }
}

/// Check if the current process is running under the SYSTEM account.
///
/// Token query failures read as "not SYSTEM".
#[must_use]
pub fn is_running_as_system() -> bool {
    let Ok(token) = open_query_token() else {
        return false;
    };
    let Ok(buffer) = token_information(&token, TokenUser) else {
        return false;
    };
    if buffer.len() < std::mem::size_of::<TOKEN_USER>() {
        return false;
    }

    unsafe {
        let user = &*buffer.as_ptr().cast::<TOKEN_USER>();
        let sid = user.User.Sid;
        !sid.is_invalid() && IsWellKnownSid(sid, WinLocalSystemSid).as_bool()
    }
}

/// Query the mandatory integrity level of the current process.
///
/// # Errors
///
/// Returns error if the process token cannot be opened or the mandatory
/// label cannot be read from it.
pub fn integrity_level() -> Result<IntegrityLevel> {
    let token = open_query_token()?;
    let buffer = token_information(&token, TokenIntegrityLevel)?;
    if buffer.len() < std::mem::size_of::<TOKEN_MANDATORY_LABEL>() {
        return Err(UserHiveError::IntegrityQueryFailed(
            "mandatory label truncated".to_string(),
        ));
    }

    unsafe {
        let label = &*buffer.as_ptr().cast::<TOKEN_MANDATORY_LABEL>();
        let sid = label.Label.Sid;
        if sid.is_invalid() {
            return Err(UserHiveError::IntegrityQueryFailed(
                "mandatory label has no SID".to_string(),
            ));
        }

        let count = GetSidSubAuthorityCount(sid);
        if count.is_null() || *count == 0 {
            return Err(UserHiveError::IntegrityQueryFailed(
                "mandatory label SID has no sub-authorities".to_string(),
            ));
        }

        // The integrity RID is the last sub-authority of the label SID.
        let rid = GetSidSubAuthority(sid, u32::from(*count) - 1);
        if rid.is_null() {
            return Err(UserHiveError::IntegrityQueryFailed(
                "mandatory label RID unavailable".to_string(),
            ));
        }
        Ok(IntegrityLevel::from_rid(*rid))
    }
}
