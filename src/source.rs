//! Resilience files on disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, StringRecord};

use crate::prelude::*;

/// Regular files in `directory` whose name contains `include` and does not contain `exclude`.
///
/// Sorted by path, so that batches are processed in a stable order.
#[instrument(skip_all, fields(directory = %directory.display()))]
pub fn discover(directory: &Path, include: &str, exclude: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(directory)
        .with_context(|| format!("failed to list `{}`", directory.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.contains(include) && !name.contains(exclude) {
            paths.push(entry.path());
        }
    }
    paths.sort();
    info!(n_files = paths.len(), "discovered");
    Ok(paths)
}

/// Read every line of a comma-separated file as a row.
///
/// Blank lines are kept as empty rows: they take part in the event table layout, which the
/// CSV reader alone would not preserve.
pub fn read_rows(path: &Path) -> Result<Vec<StringRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    text.lines()
        .enumerate()
        .map(|(index, line)| {
            ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_reader(line.as_bytes())
                .records()
                .next()
                .transpose()
                .with_context(|| format!("line {} of `{}`", index + 1, path.display()))
                .map(Option::unwrap_or_default)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_discover() -> Result {
        let directory = tempfile::tempdir()?;
        for name in [
            "b_resilience.csv",
            "a_resilience.csv",
            "a_resilience_superloop.csv",
            "a_dispatch.csv",
        ] {
            fs::write(directory.path().join(name), "")?;
        }
        fs::create_dir(directory.path().join("nested_resilience"))?;

        let names = discover(directory.path(), "resilience", "superloop")?
            .into_iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(names, ["a_resilience.csv", "b_resilience.csv"]);
        Ok(())
    }

    #[test]
    fn test_read_rows_keeps_blank_lines() -> Result {
        let file = tempfile::NamedTempFile::new()?;
        fs::write(
            file.path(),
            "PV scaling factor,500\r\n\nOutage,Outage start,TTFF,COT\n,,[h],[h]\n1,2020-01-01 00:00:00,10,\"1.5\"\n",
        )?;
        let rows = read_rows(file.path())?;
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], StringRecord::from(vec!["PV scaling factor", "500"]));
        assert!(rows[1].is_empty());
        assert_eq!(rows[2].get(0), Some("Outage"));
        assert_eq!(rows[3].len(), 4);
        assert_eq!(rows[4].get(3), Some("1.5"));
        Ok(())
    }

    #[test]
    fn test_read_missing_file() {
        let error = read_rows(Path::new("/nonexistent/resilience.csv")).unwrap_err();
        assert!(format!("{error:#}").contains("failed to read"));
    }
}
