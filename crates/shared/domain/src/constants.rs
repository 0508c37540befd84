// Roles
pub const GUEST: &str = "guest";
pub const STUDENT: &str = "student";
pub const EDUCATOR: &str = "educator";
pub const ADMIN: &str = "admin";

// Ledger record kinds
pub const BOOKMARK: &str = "bookmark";
pub const PURCHASE: &str = "purchase";
pub const REVIEW: &str = "review";
pub const REGISTRATION: &str = "registration";
pub const TRANSACTION: &str = "transaction";

/// Resource id under which a registration is keyed; the email alone is the identity.
pub const ACCOUNT: &str = "account";

pub const DEFAULT_CATEGORY: &str = "General";
pub const DRAFT_PLACEHOLDER_TITLE: &str = "Untitled Draft";

pub const MEBIBYTE: u64 = 1024 * 1024;
pub const CONFIRMATION_WINDOW_SECS: u64 = 15 * 60;
