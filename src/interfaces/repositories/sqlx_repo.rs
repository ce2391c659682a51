/// Video repository backed by the process-wide Postgres pool.
///
/// Holds only the connection string; the pool itself is created on first
/// use and shared by every clone.
#[derive(Clone)]
pub struct SqlxVideoRepo {
    pub database_url: String,
}
