pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::error::{RuleError, RuleErrorExt};
pub use crate::pipeline::RuleChain;
pub use crate::safe_nanoid;
pub use crate::security::access::AccessGuard;
pub use chub_domain::identity::{Principal, Role, RoleSet};
pub use chub_domain::outcome::ErrorKind;
