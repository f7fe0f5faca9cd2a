pub mod security;

pub use security::{is_security_related, SECURITY_KEYWORDS};
