//! Collaborator contracts consumed by the workflow: data access (catalog,
//! previews, ad-hoc queries) and chart persistence. The host wires these to
//! its HTTP/query layer; the library never performs I/O itself.

use crate::definition::SaveRequest;
use crate::error::Error;
use crate::result_set::ResultSet;

/// Data-catalog and query-execution collaborator.
pub trait DataBackend {
    /// Catalog of selectable sources. Internal bookkeeping tables may be
    /// present in the listing; the catalog filters them out.
    fn list_tables(&self) -> Result<Vec<String>, Error>;

    /// Preview rows for a selected source.
    fn fetch_table(&self, name: &str) -> Result<ResultSet, Error>;

    /// Run ad-hoc SQL. Malformed or rejected SQL yields [`Error::Query`]
    /// with a human-readable message; success may be an empty result set.
    fn execute_query(&self, sql: &str) -> Result<ResultSet, Error>;
}

/// Persistence collaborator. Success is a 2xx-equivalent acknowledgment;
/// anything else, including transport failure, is an [`Error::Persistence`].
pub trait ChartStore {
    fn save_chart(&self, request: &SaveRequest) -> Result<(), Error>;
}
