//! # Hotel Security
//!
//! Security utilities: JWT issue/validation, bearer header parsing, password hashing.

pub mod bearer;
pub mod jwt;
pub mod password;

pub use bearer::extract_bearer;
pub use jwt::{Claims, IssuedToken, JwtService};
pub use password::PasswordService;
