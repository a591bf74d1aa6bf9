//! Authentication module
//!
//! JWT session tokens, bcrypt credential hashing and the request gate.

mod access;
mod jwt;
mod middleware;
mod password;

pub use access::{require_admin, require_owner_or_admin};
pub use jwt::{Claims, JwtService};
pub use middleware::{authenticate, bearer_token, require_auth, AuthUser};
pub use password::{PasswordService, HASH_COST};
