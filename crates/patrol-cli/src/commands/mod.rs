//! Command implementations.

pub mod classify;
pub mod scan;

pub use self::classify::execute_classify;
pub use self::scan::execute_scan;
