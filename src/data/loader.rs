use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use super::cache::TtlCache;
use super::filter::filter_by_class;
use super::model::{Row, Table};
use crate::error::LoadError;

/// How long a fetched sheet is reused before it is fetched again.
pub const CACHE_TTL: Duration = Duration::from_secs(300);

// ---------------------------------------------------------------------------
// Fetching raw sheet text
// ---------------------------------------------------------------------------

/// Source of raw CSV text for a locator.
pub trait Fetch: Send + Sync {
    fn fetch(&self, locator: &str) -> Result<String>;
}

/// Fetches `http(s)://` locators over the network; anything else is read
/// from the local filesystem (an optional `file://` prefix is stripped).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Build a fetcher. `timeout` of `None` keeps the transport default.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("building HTTP client")?;
        Ok(Self { client })
    }

    fn fetch_http(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("requesting {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            bail!("HTTP {status} from {url}");
        }
        resp.text().context("reading response body")
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, locator: &str) -> Result<String> {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            return self.fetch_http(locator);
        }
        let path = Path::new(locator.strip_prefix("file://").unwrap_or(locator));
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Parse CSV text: first row is the header, any column order.
///
/// Headers are trimmed; a repeated header gets a `.1`, `.2`… suffix so
/// column names stay unique. Short rows read as `Null` in the missing cells.
pub fn parse_csv(text: &str) -> Result<Table> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        bail!("sheet is empty");
    }
    if text.trim_start().starts_with('<') {
        bail!("content is not CSV (looks like an HTML page)");
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns = unique_headers(
        reader
            .headers()
            .context("reading CSV headers")?
            .iter()
            .map(|h| h.trim().to_string()),
    );

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let mut row = Row::new();
        for (idx, col) in columns.iter().enumerate() {
            row.insert(col.clone(), record.get(idx).unwrap_or(""));
        }
        rows.push(row);
    }

    Ok(Table::new(columns, rows))
}

fn unique_headers(headers: impl Iterator<Item = String>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for header in headers {
        let mut name = header.clone();
        let mut n = 1;
        while columns.contains(&name) {
            name = format!("{header}.{n}");
            n += 1;
        }
        columns.push(name);
    }
    columns
}

// ---------------------------------------------------------------------------
// Cached loader
// ---------------------------------------------------------------------------

/// Cache key: locator plus optional class filter.
pub type CacheKey = (String, Option<String>);

/// Fetches, parses and filters sheets, memoizing each `(locator, filter)`
/// result for [`CACHE_TTL`].
pub struct Loader<F: Fetch = HttpFetcher> {
    fetcher: F,
    cache: TtlCache<CacheKey, Table>,
}

impl<F: Fetch> Loader<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_ttl(fetcher, CACHE_TTL)
    }

    pub fn with_ttl(fetcher: F, ttl: Duration) -> Self {
        Self {
            fetcher,
            cache: TtlCache::new(ttl),
        }
    }

    /// Load the table at `locator`, keeping only `class_key` rows if given.
    pub fn load(&self, locator: &str, class_key: Option<&str>) -> Result<Arc<Table>, LoadError> {
        let key = (locator.to_string(), class_key.map(str::to_string));
        self.cache.get_or_try_load(key, || self.load_uncached(locator, class_key))
    }

    /// Drop every cached table; the next load of any key fetches again.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    #[cfg(test)]
    pub(crate) fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn load_uncached(&self, locator: &str, class_key: Option<&str>) -> Result<Table, LoadError> {
        log::info!("Fetching sheet {locator} (class filter: {class_key:?})");
        let text = self.fetcher.fetch(locator)?;
        let table = parse_csv(&text)?;
        let table = match class_key {
            Some(key) => filter_by_class(&table, key)?,
            None => table,
        };
        log::info!(
            "Loaded {} rows with columns {:?}",
            table.len(),
            table.columns
        );
        Ok(table)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    use super::*;
    use crate::data::model::CellValue;

    /// In-memory fetcher that counts how often each locator is hit.
    #[derive(Default)]
    pub(crate) struct FakeFetcher {
        sheets: HashMap<String, String>,
        pub(crate) calls: AtomicUsize,
    }

    impl FakeFetcher {
        pub(crate) fn with_sheet(mut self, locator: &str, csv: &str) -> Self {
            self.sheets.insert(locator.to_string(), csv.to_string());
            self
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Fetch for FakeFetcher {
        fn fetch(&self, locator: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.sheets.get(locator) {
                Some(csv) => Ok(csv.clone()),
                None => bail!("connection refused: {locator}"),
            }
        }
    }

    const SHARED: &str = "\
TURMA,MATRICULA,NOME,AV 01,AV 02
4P_A,1,Ana,8,6
4P_B,2,Bruno,5,7
4P_A,3,Carla,9,9
";

    #[test]
    fn parse_trims_headers_and_types_cells() {
        let table = parse_csv(" MATRÍCULA , Aluno ,AV. 01,AV. 02\n1234567,Ana,8,#N/A\n").unwrap();
        assert_eq!(table.columns, vec!["MATRÍCULA", "Aluno", "AV. 01", "AV. 02"]);
        let row = &table.rows[0];
        assert_eq!(row["MATRÍCULA"], CellValue::Integer(1234567));
        assert_eq!(row["Aluno"], CellValue::String("Ana".into()));
        assert_eq!(row["AV. 02"], CellValue::String("#N/A".into()));
    }

    #[test]
    fn parse_tolerates_ragged_rows_and_bom() {
        let table = parse_csv("\u{feff}A,B,C\n1,2\n").unwrap();
        assert_eq!(table.columns[0], "A");
        assert_eq!(table.rows[0]["C"], CellValue::Null);
    }

    #[test]
    fn parse_dedupes_headers() {
        let table = parse_csv("AV,AV,AV\n1,2,3\n").unwrap();
        assert_eq!(table.columns, vec!["AV", "AV.1", "AV.2"]);
        assert_eq!(table.rows[0]["AV.2"], CellValue::Integer(3));
    }

    #[test]
    fn parse_rejects_non_tabular_content() {
        assert!(parse_csv("").is_err());
        assert!(parse_csv("  \n").is_err());
        assert!(parse_csv("<!DOCTYPE html><html></html>").is_err());
    }

    #[test]
    fn filter_key_reduces_rows() {
        let loader = Loader::new(FakeFetcher::default().with_sheet("mem://ml", SHARED));
        let all = loader.load("mem://ml", None).unwrap();
        let class_a = loader.load("mem://ml", Some("4P_A")).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(class_a.len(), 2);
    }

    #[test]
    fn missing_class_column_fails_load() {
        let loader = Loader::new(FakeFetcher::default().with_sheet("mem://poo", "MATRICULA\n1\n"));
        assert!(matches!(
            loader.load("mem://poo", Some("4P_A")),
            Err(LoadError::MissingFilterColumn)
        ));
    }

    #[test]
    fn repeated_loads_share_one_fetch() {
        let loader = Loader::new(FakeFetcher::default().with_sheet("mem://ml", SHARED));
        let first = loader.load("mem://ml", Some("4P_A")).unwrap();
        let second = loader.load("mem://ml", Some("4P_A")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.fetcher.calls(), 1);

        // a different filter is a different key
        loader.load("mem://ml", Some("4P_B")).unwrap();
        assert_eq!(loader.fetcher.calls(), 2);
    }

    #[test]
    fn invalidate_forces_refetch() {
        let loader = Loader::new(FakeFetcher::default().with_sheet("mem://ml", SHARED));
        let first = loader.load("mem://ml", None).unwrap();
        loader.invalidate_all();
        let second = loader.load("mem://ml", None).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(loader.fetcher.calls(), 2);
    }

    #[test]
    fn expired_entry_is_refetched() {
        let loader = Loader::new(FakeFetcher::default().with_sheet("mem://ml", SHARED));
        let key = ("mem://ml".to_string(), None);
        loader.load("mem://ml", None).unwrap();

        let later = Instant::now() + CACHE_TTL + Duration::from_secs(1);
        loader
            .cache
            .get_or_try_load_at(key, later, || loader.load_uncached("mem://ml", None))
            .unwrap();
        assert_eq!(loader.fetcher.calls(), 2);
    }

    #[test]
    fn failures_are_reported_and_not_cached() {
        let loader = Loader::new(FakeFetcher::default());
        let err = loader.load("mem://nowhere", None).unwrap_err();
        assert!(err.to_string().contains("connection refused"));
        assert!(loader.load("mem://nowhere", None).is_err());
        assert_eq!(loader.fetcher.calls(), 2);
    }

    #[test]
    fn file_locators_are_read_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SHARED.as_bytes()).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let fetcher = HttpFetcher::new(None).unwrap();
        assert_eq!(fetcher.fetch(&path).unwrap(), SHARED);
        assert_eq!(fetcher.fetch(&format!("file://{path}")).unwrap(), SHARED);
        assert!(fetcher.fetch("/definitely/not/here.csv").is_err());
    }
}
