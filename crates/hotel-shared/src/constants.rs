//! Application-wide constants

/// Header carrying the hotel (tenant) code chosen by the caller.
pub const HOTEL_CODE_HEADER: &str = "x-hotel-code";

/// Roles that may list every hotel in the directory.
pub const FULL_ACCESS_ROLES: [&str; 3] = ["Admin", "Manager", "Accountant"];

pub const DEFAULT_JWT_ISSUER: &str = "ZaaerIntegration";
pub const DEFAULT_JWT_AUDIENCE: &str = "ZaaerIntegration";
pub const DEFAULT_TOKEN_EXPIRATION_MINUTES: i64 = 1440;
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_TENANT_DB_PORT: u16 = 5432;
