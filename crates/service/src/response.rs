//! Response rows and builders
//!
//! A [`ResponseBuilder`] turns one raw index hit into one typed
//! [`PageRow`]. Builders are pure: the same hit always yields the same row,
//! and a builder holds no state between calls, so one shared instance
//! serves every request.
//!
//! A hit the builder cannot read is a data-integrity failure, not a usage
//! error: the whole page build aborts with
//! [`QueryError::IndexCorruption`] and no partial page is returned.

use refquery_core::{fields, QueryError, RawHit};
use serde::{Deserialize, Serialize};

// ============================================================================
// PageRow
// ============================================================================

/// One typed row of a query result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageRow {
    /// An artifact, identified by its path.
    Resource {
        /// Path of the matched artifact.
        path: String,
    },
    /// A rule, identified by name and owning package.
    RuleName {
        /// Name of the matched rule.
        name: String,
        /// Package the rule belongs to.
        package_name: String,
    },
}

// ============================================================================
// ResponseBuilder
// ============================================================================

/// Maps one raw index hit into one typed row.
///
/// Implementations must be deterministic and must only fail on hits that
/// violate the stored schema their query expects.
pub trait ResponseBuilder: Send + Sync {
    /// Build the row for one hit.
    fn build(&self, hit: &RawHit) -> Result<PageRow, QueryError>;
}

/// First value of a stored field, or the corruption error naming what is
/// missing.
fn required<'a>(hit: &'a RawHit, field: &str) -> Result<&'a str, QueryError> {
    hit.first(field).ok_or_else(|| QueryError::IndexCorruption {
        reason: format!("hit {} is missing the '{field}' field", hit.doc),
    })
}

/// Builds [`PageRow::Resource`] rows from the stored artifact path.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceBuilder;

impl ResponseBuilder for ResourceBuilder {
    fn build(&self, hit: &RawHit) -> Result<PageRow, QueryError> {
        Ok(PageRow::Resource {
            path: required(hit, fields::PATH)?.to_string(),
        })
    }
}

/// Builds [`PageRow::RuleName`] rows from the stored rule name and package.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleNameBuilder;

impl ResponseBuilder for RuleNameBuilder {
    fn build(&self, hit: &RawHit) -> Result<PageRow, QueryError> {
        let name = required(hit, fields::RULE_NAME)?.to_string();
        let package_name = required(hit, fields::PACKAGE_NAME)?.to_string();
        Ok(PageRow::RuleName { name, package_name })
    }
}
