pub mod diagnostics;
pub mod error;
pub mod os;
pub mod process;
pub mod registry;
pub mod user_key;

// Public, stable-ish API surface for consumers

pub use crate::diagnostics::{DiagnosticSink, TracingSink};

pub use crate::error::{Result, UserHiveError};

pub use crate::process::{integrity_level, is_running_as_system, IntegrityLevel};

pub use crate::registry::{read_string_value, write_string_value};

pub use crate::user_key::{has_access, UserKey};

pub mod prelude {
    pub use crate::diagnostics::{DiagnosticSink, TracingSink};
    pub use crate::error::{Result, UserHiveError};
    pub use crate::process::{integrity_level, is_running_as_system, IntegrityLevel};
    pub use crate::registry::{read_string_value, write_string_value};
    pub use crate::user_key::{has_access, UserKey};
}
