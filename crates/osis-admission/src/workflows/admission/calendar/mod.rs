//! Registration calendar: which admission pool and academic year a request falls in.
//!
//! Every pool opens a window per academic year. At a given date the open windows are matched
//! against the candidate's profile and declarations, priority pools first.

mod pool;
mod service;
mod window;

pub use pool::{is_quota_non_resident, AdmissionPool, PoolContext, PoolDeclarations};
pub use service::{DeterminedPool, PoolRequest, RegistrationCalendar};
pub use window::{AnchorDate, EnrolmentPeriod, PoolWindow, WindowEnd};
