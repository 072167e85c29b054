/// Outcome of a statement that targets a single row.
///
/// The store never reports "not found" itself; absence is read off an empty
/// row set. Keyed statements match at most one row, so extra rows are logged
/// and dropped rather than returned.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn from_rows(rows: Vec<T>) -> Self {
        let count = rows.len();
        let mut rows = rows.into_iter();
        match rows.next() {
            Some(row) => {
                if count > 1 {
                    tracing::warn!("Keyed statement matched {} rows; using the first", count);
                }
                Lookup::Found(row)
            }
            None => Lookup::NotFound,
        }
    }
}
