//! Batch summary of every configuration file into one wide table.

use std::{collections::HashMap, fmt::Display};

use csv::StringRecord;

use crate::{
    prelude::*,
    quantity::time::Hours,
    tradespace::{
        TradespaceError,
        confidence::{ConfidenceSummary, SummaryRow},
        metadata::{ConfigKey, ConfigParams, Metadata},
        outage::OutageDataset,
    },
};

/// File excluded from the batch, and why.
#[derive(Debug)]
pub struct Failure<Id> {
    pub id: Id,
    pub error: Error,
}

/// Outcome of a batch: the partial table and everything that was left out of it.
#[must_use]
#[derive(Debug)]
pub struct Assembly<Id> {
    pub summary: ConfidenceSummary,
    pub failures: Vec<Failure<Id>>,

    /// Row position of every configuration in the summary.
    positions: HashMap<ConfigKey, usize>,
}

impl<Id: Display> Assembly<Id> {
    fn new(durations: Vec<Hours>) -> Self {
        Self {
            summary: ConfidenceSummary::new(durations),
            failures: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Append the outcome of one file.
    fn with(mut self, id: Id, outcome: Result<SummaryRow>) -> Self {
        let error = match outcome {
            Ok(row) => match self.positions.get(&row.config).copied() {
                None => {
                    self.positions.insert(row.config, self.summary.rows.len());
                    self.summary.rows.push(row);
                    return self;
                }
                Some(position) if self.summary.rows[position] == row => {
                    debug!(file = %id, config = ?row.config, "duplicate configuration collapsed");
                    return self;
                }
                Some(_) => Error::new(TradespaceError::DataIntegrity(format!(
                    "configuration {:?} is already summarized with different confidences",
                    row.config,
                ))),
            },
            Err(error) => error,
        };
        warn!(file = %id, "excluded: {error:#}");
        self.failures.push(Failure { id, error });
        self
    }

    fn sorted(mut self) -> Self {
        self.summary.rows.sort_by_key(|row| row.config);
        self.positions.clear();
        self
    }
}

/// Summarize every file into one row of the wide table.
///
/// `read_rows` fetches the raw rows of a file. Any failure excludes only that file, the batch
/// continues. The rows are ordered by configuration.
#[instrument(skip_all, fields(n_durations = durations.len()))]
pub fn assemble<Id, R>(
    ids: impl IntoIterator<Item = Id>,
    durations: &[Hours],
    mut read_rows: R,
) -> Assembly<Id>
where
    Id: Display,
    R: FnMut(&Id) -> Result<Vec<StringRecord>>,
{
    let assembly = ids.into_iter().fold(Assembly::new(durations.to_vec()), |assembly, id| {
        info!(file = %id, "summarizing…");
        let outcome = read_rows(&id)
            .with_context(|| format!("failed to read `{id}`"))
            .and_then(|rows| summarize_rows(&rows, durations).map_err(Error::from));
        assembly.with(id, outcome)
    });
    info!(
        n_configurations = assembly.summary.len(),
        n_failures = assembly.failures.len(),
        "assembled",
    );
    assembly.sorted()
}

/// Metadata, event table and confidence of a single file.
pub fn summarize_rows(
    rows: &[StringRecord],
    durations: &[Hours],
) -> Result<SummaryRow, TradespaceError> {
    let params = ConfigParams::try_from(&Metadata::extract(rows)?)?;
    OutageDataset::load(rows, params)?.summarize(durations)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{
        quantity::scalar::Scalar,
        tradespace::outage::tests::{file_rows, params},
    };

    fn durations() -> Vec<Hours> {
        vec![Hours::from(24.0), Hours::from(504.0)]
    }

    fn with_solar_scale(mut rows: Vec<StringRecord>, solar_scale: &str) -> Vec<StringRecord> {
        rows[1] = StringRecord::from(vec!["PV scaling factor", solar_scale]);
        rows
    }

    fn assemble_files(files: &HashMap<&'static str, Vec<StringRecord>>) -> Assembly<&'static str> {
        let mut ids = files.keys().copied().collect::<Vec<_>>();
        ids.sort_unstable();
        assemble(ids, &durations(), |id| {
            files.get(id).cloned().with_context(|| format!("no such file: {id}"))
        })
    }

    #[test]
    fn test_empty_batch() {
        let assembly = assemble(Vec::<String>::new(), &durations(), |_| unreachable!());
        assert!(assembly.summary.is_empty());
        assert_eq!(assembly.summary.durations, durations());
        assert!(assembly.failures.is_empty());
    }

    #[test]
    fn test_rows_are_sorted_by_configuration() {
        let files = HashMap::from([
            ("a_resilience.csv", with_solar_scale(file_rows(&[10.0, 600.0]), "750")),
            ("b_resilience.csv", file_rows(&[10.0, 30.0, 50.0, 600.0])),
        ]);
        let assembly = assemble_files(&files);
        assert!(assembly.failures.is_empty());
        assert_eq!(assembly.summary.len(), 2);
        assert_eq!(assembly.summary.rows[0].config, params().key);
        assert_abs_diff_eq!(assembly.summary.rows[0].confidences[0], 0.75);
        assert_eq!(assembly.summary.rows[1].config.solar_scale, Scalar::from(750.0));
        assert_abs_diff_eq!(assembly.summary.rows[1].confidences[1], 0.5);
    }

    #[test]
    fn test_zero_outages_excluded_batch_continues() {
        let files = HashMap::from([
            ("a_resilience.csv", with_solar_scale(file_rows(&[]), "750")),
            ("b_resilience.csv", file_rows(&[10.0, 30.0, 50.0, 600.0])),
        ]);
        let assembly = assemble_files(&files);
        assert_eq!(assembly.summary.len(), 1);
        assert_eq!(assembly.failures.len(), 1);
        let failure = &assembly.failures[0];
        assert_eq!(failure.id, "a_resilience.csv");
        assert!(matches!(
            failure.error.downcast_ref::<TradespaceError>(),
            Some(TradespaceError::Division(_)),
        ));
    }

    #[test]
    fn test_every_failure_is_collected() {
        let mut missing_metadata = file_rows(&[10.0]);
        missing_metadata.remove(2);
        let files = HashMap::from([
            ("a_resilience.csv", missing_metadata),
            ("c_resilience.csv", file_rows(&[10.0])),
        ]);
        let mut ids = vec!["a_resilience.csv", "b_resilience.csv", "c_resilience.csv"];
        ids.sort_unstable();
        let assembly = assemble(ids, &durations(), |id| {
            files.get(id).cloned().with_context(|| format!("no such file: {id}"))
        });
        assert_eq!(assembly.summary.len(), 1);
        let failed = assembly.failures.iter().map(|failure| failure.id).collect::<Vec<_>>();
        assert_eq!(failed, ["a_resilience.csv", "b_resilience.csv"]);
        assert!(matches!(
            assembly.failures[0].error.downcast_ref::<TradespaceError>(),
            Some(TradespaceError::MissingParameter(_)),
        ));
        assert!(format!("{:#}", assembly.failures[1].error).contains("failed to read"));
    }

    #[test]
    fn test_identical_duplicate_collapses() {
        let files = HashMap::from([
            ("a_resilience.csv", file_rows(&[10.0, 600.0])),
            ("b_resilience.csv", file_rows(&[10.0, 600.0])),
        ]);
        let assembly = assemble_files(&files);
        assert_eq!(assembly.summary.len(), 1);
        assert!(assembly.failures.is_empty());
    }

    #[test]
    fn test_conflicting_duplicate_is_excluded() {
        let files = HashMap::from([
            ("a_resilience.csv", file_rows(&[10.0, 600.0])),
            ("b_resilience.csv", file_rows(&[10.0, 30.0])),
        ]);
        let assembly = assemble_files(&files);
        assert_eq!(assembly.summary.len(), 1);
        assert_abs_diff_eq!(assembly.summary.rows[0].confidences[1], 0.5);
        assert_eq!(assembly.failures.len(), 1);
        assert_eq!(assembly.failures[0].id, "b_resilience.csv");
        assert!(matches!(
            assembly.failures[0].error.downcast_ref::<TradespaceError>(),
            Some(TradespaceError::DataIntegrity(_)),
        ));
    }

    #[test]
    fn test_conflict_detected_after_many_configurations() {
        let conflicting = with_solar_scale(file_rows(&[10.0, 30.0]), "100");
        let files = (0..50)
            .map(|i| {
                let rows = with_solar_scale(file_rows(&[10.0, 600.0]), &(100 + i).to_string());
                (format!("{i:02}_resilience.csv"), rows)
            })
            .chain([("99_resilience.csv".to_string(), conflicting)])
            .collect::<Vec<_>>();
        let assembly = assemble(files.iter().map(|(id, _)| id.clone()), &durations(), |id| {
            files
                .iter()
                .find(|(candidate, _)| candidate == id)
                .map(|(_, rows)| rows.clone())
                .with_context(|| format!("no such file: {id}"))
        });
        assert_eq!(assembly.summary.len(), 50);
        assert_eq!(assembly.failures.len(), 1);
        assert_eq!(assembly.failures[0].id, "99_resilience.csv");
        assert!(matches!(
            assembly.failures[0].error.downcast_ref::<TradespaceError>(),
            Some(TradespaceError::DataIntegrity(_)),
        ));
    }
}
