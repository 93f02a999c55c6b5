/// Read path: `read()`, `find()` and `find_with()`.
///
/// Reads take no lock. A record being rewritten by a concurrent `update`
/// may be observed half old, half new.
use datafile::Mode;
use matcher::{PrefixMatcher, RecordMatcher};
use tracing::trace;

use crate::validate::{check_range, to_slot};
use crate::{Result, Store};

impl Store {
    /// Returns the fields of `slot`, or `None` if it has been deleted.
    ///
    /// Values come back exactly as stored, padding included.
    ///
    /// # Errors
    ///
    /// `NotFound` if `slot` is out of range; `Storage` on I/O failure.
    pub fn read(&self, slot: u32) -> Result<Option<Vec<String>>> {
        self.with_file(Mode::Read, |df| {
            check_range(df, slot)?;
            df.seek_record(slot)?;
            let record = df.next_record()?;
            Ok((!record.deleted).then(|| record.to_strings()))
        })
    }

    /// Returns, in ascending order, the slots of every live record whose
    /// fields start with the corresponding criteria. `None` or `""` matches
    /// anything.
    pub fn find<S: AsRef<str>>(&self, criteria: &[Option<S>]) -> Result<Vec<u32>> {
        self.find_with(criteria, &PrefixMatcher)
    }

    /// Like [`find`](Store::find) but with a caller-chosen match rule.
    pub fn find_with<S: AsRef<str>>(
        &self,
        criteria: &[Option<S>],
        matcher: &dyn RecordMatcher,
    ) -> Result<Vec<u32>> {
        let criteria: Vec<Option<String>> = criteria
            .iter()
            .map(|c| c.as_ref().map(|s| s.as_ref().to_string()))
            .collect();

        let hits = self.with_file(Mode::Read, |df| {
            df.seek_record(0)?;
            let mut hits = Vec::new();
            for entry in df.records()? {
                let (slot, record) = entry?;
                if !record.deleted && matcher.matches(&record.to_strings(), &criteria) {
                    hits.push(to_slot(slot)?);
                }
            }
            Ok(hits)
        })?;

        trace!(matches = hits.len(), "find complete");
        Ok(hits)
    }
}
