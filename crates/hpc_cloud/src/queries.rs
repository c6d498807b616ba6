//! The precondition query seam.

use crate::error::CloudResult;

/// Live-state queries backing the blueprint precondition checks.
///
/// Each call returns `Ok(())` when the identifier exists (or the pair is
/// consistent) and an error otherwise. Implementations perform blocking I/O
/// and apply no retries of their own.
pub trait CloudQueries {
    /// Confirm that the project exists and is visible to the caller.
    fn project_exists(&self, project_id: &str) -> CloudResult<()>;

    /// Confirm that `region` is available in the project.
    fn region_exists(&self, project_id: &str, region: &str) -> CloudResult<()>;

    /// Confirm that `zone` is available in the project.
    fn zone_exists(&self, project_id: &str, zone: &str) -> CloudResult<()>;

    /// Confirm that `zone` belongs to `region`.
    fn zone_in_region(&self, project_id: &str, zone: &str, region: &str) -> CloudResult<()>;
}
