//! Incremental load orchestration.
//!
//! A run is strictly sequential: each endpoint is fully paginated before the
//! next begins, then the delta is computed and appended in one step.

use std::time::Instant;
use tracing::{error, info, warn};
use trowel_fetch::{BoardSource, Endpoint, FetchError, PageSource, PaginationLimits, fetch_all};
use trowel_instruments::InstrumentCatalog;
use trowel_parse::{BoardParser, RecordParser};
use trowel_store::Sink;
use trowel_types::{AssetType, CanonicalRecord, ScrapeStamp, Stage};
use uuid::Uuid;

use crate::delta::{dedup_keys, find_new};
use crate::error::{RunError, RunFailure};
use crate::report::RunReport;

/// Default destination table.
pub const DEFAULT_TABLE: &str = "IceAssets";

/// Settings for one incremental load.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Destination table.
    pub table: String,
    /// Asset category this pipeline owns in the table.
    pub asset_type: AssetType,
    /// Pagination bounds per endpoint.
    pub limits: PaginationLimits,
    /// Compute the delta without appending it.
    pub dry_run: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            asset_type: AssetType::Currency,
            limits: PaginationLimits::default(),
            dry_run: false,
        }
    }
}

/// Callbacks for per-endpoint progress.
pub trait RunObserver: Send + Sync {
    /// Called before an endpoint is fetched.
    fn endpoint_started(&self, _endpoint: &Endpoint) {}

    /// Called after an endpoint was fetched and parsed.
    fn endpoint_finished(&self, _endpoint: &Endpoint, _records: usize) {}

    /// Called when an endpoint failed and was left out.
    fn endpoint_failed(&self, _endpoint: &Endpoint, _error: &FetchError) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Records gathered from the paginated API.
#[derive(Debug, Default)]
pub struct ApiCollection {
    /// Parsed records in endpoint order.
    pub records: Vec<CanonicalRecord>,
    /// Endpoints that failed, with their errors.
    pub failed: Vec<(Endpoint, FetchError)>,
}

/// One incremental load over a catalog.
#[derive(Clone, Copy)]
pub struct IncrementalLoad<'a> {
    catalog: &'a InstrumentCatalog,
    config: &'a LoadConfig,
    observer: &'a dyn RunObserver,
}

impl std::fmt::Debug for IncrementalLoad<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncrementalLoad")
            .field("catalog", &self.catalog.len())
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> IncrementalLoad<'a> {
    /// Creates a load over `catalog` with `config`.
    #[must_use]
    pub fn new(catalog: &'a InstrumentCatalog, config: &'a LoadConfig) -> Self {
        Self {
            catalog,
            config,
            observer: &NoopObserver,
        }
    }

    /// Reports endpoint progress to `observer`.
    #[must_use]
    pub fn with_observer(mut self, observer: &'a dyn RunObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Returns the load configuration.
    #[must_use]
    pub const fn config(&self) -> &LoadConfig {
        self.config
    }

    /// Fetches and parses every endpoint in order.
    ///
    /// A failing endpoint is logged and left out; the others still run.
    /// Keys repeated across overlapping pages are kept once.
    pub async fn collect_api<S>(
        &self,
        source: &S,
        endpoints: &[Endpoint],
        stamp: ScrapeStamp,
    ) -> ApiCollection
    where
        S: PageSource + ?Sized,
    {
        let parser = RecordParser::new(self.catalog);
        let mut collection = ApiCollection::default();

        for endpoint in endpoints {
            self.observer.endpoint_started(endpoint);
            info!(endpoint = %endpoint, url = endpoint.url(), "fetching");

            match fetch_all(source, endpoint.url(), &self.config.limits).await {
                Ok(items) => {
                    let parsed_all: Vec<CanonicalRecord> = parser
                        .parse_all(&items, stamp, endpoint.instrument_id())
                        .collect();
                    let total = parsed_all.len();
                    let unique = dedup_keys(parsed_all);
                    let parsed = unique.len();
                    if parsed < total {
                        warn!(endpoint = %endpoint, repeated = total - parsed, "dropped repeated keys");
                    }
                    collection.records.extend(unique);
                    info!(endpoint = %endpoint, items = items.len(), records = parsed, "fetched");
                    self.observer.endpoint_finished(endpoint, parsed);
                }
                Err(e) => {
                    error!(endpoint = %endpoint, error = %e, transient = e.is_transient(), "endpoint failed");
                    self.observer.endpoint_failed(endpoint, &e);
                    collection.failed.push((endpoint.clone(), e));
                }
            }
        }

        collection
    }

    /// Reads and parses the board snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`Stage::Fetch`] error if the snapshot cannot be read.
    pub async fn collect_board<B>(
        &self,
        source: &B,
        stamp: ScrapeStamp,
    ) -> Result<Vec<CanonicalRecord>, RunError>
    where
        B: BoardSource + ?Sized,
    {
        let snapshot = source
            .snapshot()
            .await
            .map_err(|e| RunError::new(Stage::Fetch, 0, e))?;
        let records = dedup_keys(BoardParser::new(self.catalog).parse_snapshot(&snapshot, stamp));
        info!(rows = snapshot.len(), records = records.len(), "board parsed");
        Ok(records)
    }

    /// Runs a full load from the paginated API.
    ///
    /// # Errors
    ///
    /// Fails at [`Stage::Fetch`] if no records were collected, and at
    /// [`Stage::Detect`] or [`Stage::Append`] if the sink fails.
    pub async fn run_api<S>(
        &self,
        source: &S,
        endpoints: &[Endpoint],
        sink: &mut dyn Sink,
    ) -> Result<RunReport, RunError>
    where
        S: PageSource + ?Sized,
    {
        let started = Instant::now();
        let stamp = ScrapeStamp::now();
        let collection = self.collect_api(source, endpoints, stamp).await;
        let failed: Vec<String> = collection
            .failed
            .iter()
            .map(|(endpoint, _)| endpoint.url().to_string())
            .collect();
        self.finish(collection.records, failed, sink, stamp, started)
    }

    /// Runs a full load from the board snapshot.
    ///
    /// # Errors
    ///
    /// Fails at [`Stage::Fetch`] if the snapshot is unreadable or empty, and at
    /// [`Stage::Detect`] or [`Stage::Append`] if the sink fails.
    pub async fn run_board<B>(&self, source: &B, sink: &mut dyn Sink) -> Result<RunReport, RunError>
    where
        B: BoardSource + ?Sized,
    {
        let started = Instant::now();
        let stamp = ScrapeStamp::now();
        let records = self.collect_board(source, stamp).await?;
        self.finish(records, Vec::new(), sink, stamp, started)
    }

    /// Loads existing keys and returns the new records.
    ///
    /// # Errors
    ///
    /// Returns a [`Stage::Detect`] error if the sink cannot be read.
    pub fn detect(
        &self,
        fresh: Vec<CanonicalRecord>,
        sink: &dyn Sink,
    ) -> Result<(Vec<CanonicalRecord>, usize), RunError> {
        let processed = fresh.len();
        let existing = sink
            .load_existing_keys(&self.config.table, self.config.asset_type)
            .map_err(|e| RunError::new(Stage::Detect, processed, e))?;
        let existing_count = existing.len();
        let delta = find_new(fresh, &existing);
        info!(
            fresh = processed,
            existing = existing_count,
            new = delta.len(),
            "delta computed"
        );
        Ok((delta, existing_count))
    }

    fn finish(
        &self,
        fresh: Vec<CanonicalRecord>,
        failed_endpoints: Vec<String>,
        sink: &mut dyn Sink,
        stamp: ScrapeStamp,
        started: Instant,
    ) -> Result<RunReport, RunError> {
        if fresh.is_empty() {
            return Err(RunError::new(
                Stage::Fetch,
                0,
                RunFailure::NoData {
                    failed_endpoints: failed_endpoints.len(),
                },
            ));
        }

        let fetched = fresh.len();
        let skipped_fields = fresh.iter().map(|r| r.skipped().len()).sum();
        let (delta, existing_keys) = self.detect(fresh, sink)?;

        let appended = if self.config.dry_run {
            info!(new = delta.len(), "dry run, nothing appended");
            0
        } else if delta.is_empty() {
            info!("no new records");
            0
        } else {
            sink.append_rows(&self.config.table, &delta)
                .map_err(|e| RunError::new(Stage::Append, delta.len(), e))?
        };

        if !failed_endpoints.is_empty() {
            warn!(failed = failed_endpoints.len(), "run finished with failed endpoints");
        }

        Ok(RunReport {
            run_id: Uuid::new_v4(),
            started_at: stamp,
            elapsed: started.elapsed(),
            fetched,
            existing_keys,
            appended,
            skipped_fields,
            failed_endpoints,
            dry_run: self.config.dry_run,
            delta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use trowel_fetch::{BoardSnapshot, Page, PageQuery, SnapshotError};
    use trowel_store::MemorySink;
    use trowel_types::RawItem;

    /// Serves canned single-page responses per URL; unknown URLs fail.
    struct CannedSource {
        pages: HashMap<String, Vec<RawItem>>,
    }

    #[async_trait]
    impl PageSource for CannedSource {
        async fn fetch_page(&self, url: &str, query: PageQuery) -> Result<Page, FetchError> {
            let items = self
                .pages
                .get(url)
                .ok_or(FetchError::ServerError { status: 503 })?;
            let results = items
                .iter()
                .skip(query.offset)
                .take(query.limit)
                .cloned()
                .collect();
            Ok(Page {
                results,
                count: items.len(),
            })
        }
    }

    struct StaticBoard(BoardSnapshot);

    #[async_trait]
    impl BoardSource for StaticBoard {
        async fn snapshot(&self) -> Result<BoardSnapshot, SnapshotError> {
            Ok(self.0.clone())
        }
    }

    fn item(date: &str, sell: i64) -> RawItem {
        serde_json::from_value(json!({"date": date, "sell_price": sell, "buy_price": sell - 100}))
            .unwrap()
    }

    fn usd_endpoints(catalog: &InstrumentCatalog) -> Vec<Endpoint> {
        [14, 15]
            .iter()
            .filter_map(|id| catalog.get(*id).and_then(Endpoint::for_instrument))
            .collect()
    }

    fn source(endpoints: &[Endpoint]) -> CannedSource {
        let mut pages = HashMap::new();
        pages.insert(
            endpoints[0].url().to_string(),
            vec![item("14010101", 28500), item("14010102", 28600)],
        );
        pages.insert(endpoints[1].url().to_string(), vec![item("14010101", 29000)]);
        CannedSource { pages }
    }

    #[tokio::test]
    async fn test_first_run_appends_everything() {
        let catalog = InstrumentCatalog::builtin();
        let config = LoadConfig::default();
        let endpoints = usd_endpoints(&catalog);
        let mut sink = MemorySink::new();

        let report = IncrementalLoad::new(&catalog, &config)
            .run_api(&source(&endpoints), &endpoints, &mut sink)
            .await
            .unwrap();

        assert_eq!(report.fetched, 3);
        assert_eq!(report.existing_keys, 0);
        assert_eq!(report.appended, 3);
        assert!(report.is_complete());
        assert_eq!(sink.rows(DEFAULT_TABLE).len(), 3);
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let catalog = InstrumentCatalog::builtin();
        let config = LoadConfig::default();
        let endpoints = usd_endpoints(&catalog);
        let source = source(&endpoints);
        let mut sink = MemorySink::new();
        let load = IncrementalLoad::new(&catalog, &config);

        load.run_api(&source, &endpoints, &mut sink).await.unwrap();
        let second = load.run_api(&source, &endpoints, &mut sink).await.unwrap();

        assert_eq!(second.existing_keys, 3);
        assert_eq!(second.new_records(), 0);
        assert_eq!(second.appended, 0);
        assert_eq!(sink.rows(DEFAULT_TABLE).len(), 3);
    }

    #[tokio::test]
    async fn test_failed_endpoint_is_isolated() {
        let catalog = InstrumentCatalog::builtin();
        let config = LoadConfig::default();
        let endpoints = usd_endpoints(&catalog);
        let mut source = source(&endpoints);
        source.pages.remove(endpoints[1].url());
        let mut sink = MemorySink::new();

        let report = IncrementalLoad::new(&catalog, &config)
            .run_api(&source, &endpoints, &mut sink)
            .await
            .unwrap();

        assert_eq!(report.appended, 2);
        assert_eq!(report.failed_endpoints, vec![endpoints[1].url().to_string()]);
    }

    #[tokio::test]
    async fn test_no_data_fails_fetch_stage() {
        let catalog = InstrumentCatalog::builtin();
        let config = LoadConfig::default();
        let endpoints = usd_endpoints(&catalog);
        let empty = CannedSource {
            pages: HashMap::new(),
        };
        let mut sink = MemorySink::new();

        let err = IncrementalLoad::new(&catalog, &config)
            .run_api(&empty, &endpoints, &mut sink)
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Fetch);
        assert!(matches!(
            err.source,
            RunFailure::NoData {
                failed_endpoints: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let catalog = InstrumentCatalog::builtin();
        let config = LoadConfig {
            dry_run: true,
            ..LoadConfig::default()
        };
        let endpoints = usd_endpoints(&catalog);
        let mut sink = MemorySink::new();

        let report = IncrementalLoad::new(&catalog, &config)
            .run_api(&source(&endpoints), &endpoints, &mut sink)
            .await
            .unwrap();

        assert!(report.dry_run);
        assert_eq!(report.new_records(), 3);
        assert_eq!(report.appended, 0);
        assert!(sink.rows(DEFAULT_TABLE).is_empty());
    }

    #[tokio::test]
    async fn test_sink_failure_reports_detect_stage() {
        let catalog = InstrumentCatalog::builtin();
        let config = LoadConfig {
            table: "not a table".into(),
            ..LoadConfig::default()
        };
        let endpoints = usd_endpoints(&catalog);
        let mut sink = MemorySink::new();

        let err = IncrementalLoad::new(&catalog, &config)
            .run_api(&source(&endpoints), &endpoints, &mut sink)
            .await
            .unwrap_err();

        assert_eq!(err.stage, Stage::Detect);
        assert_eq!(err.processed, 3);
        assert!(matches!(err.source, RunFailure::Sink(_)));
    }

    #[tokio::test]
    async fn test_board_run() {
        let catalog = InstrumentCatalog::builtin();
        let config = LoadConfig::default();
        let board = StaticBoard(
            BoardSnapshot::from_columns(
                vec!["۱۴۰۴/۰۵/۲۱".into(), "۱۴۰۴/۰۵/۲۱".into()],
                vec!["یورو".into(), "ین ژاپن".into()],
                vec!["۹۸,۵۰۰".into(), "۶۲۰".into()],
            )
            .unwrap(),
        );
        let mut sink = MemorySink::new();
        let load = IncrementalLoad::new(&catalog, &config);

        let report = load.run_board(&board, &mut sink).await.unwrap();
        assert_eq!(report.appended, 2);

        let again = load.run_board(&board, &mut sink).await.unwrap();
        assert_eq!(again.appended, 0);
    }

    /// Newest-first history that gains a row between two page requests.
    struct ShiftingHistory;

    #[async_trait]
    impl PageSource for ShiftingHistory {
        async fn fetch_page(&self, _url: &str, query: PageQuery) -> Result<Page, FetchError> {
            let results = match query.offset {
                0 => vec![item("14010103", 3), item("14010102", 2)],
                2 => vec![item("14010102", 2), item("14010101", 1)],
                _ => Vec::new(),
            };
            Ok(Page { results, count: 4 })
        }
    }

    #[tokio::test]
    async fn test_overlapping_pages_append_each_key_once() {
        let catalog = InstrumentCatalog::builtin();
        let config = LoadConfig {
            limits: PaginationLimits::new(2, None).unwrap(),
            ..LoadConfig::default()
        };
        let endpoints = usd_endpoints(&catalog)[..1].to_vec();
        let mut sink = MemorySink::new();

        let report = IncrementalLoad::new(&catalog, &config)
            .run_api(&ShiftingHistory, &endpoints, &mut sink)
            .await
            .unwrap();

        assert_eq!(report.fetched, 3);
        assert_eq!(report.appended, 3);
        let rows = sink.rows(DEFAULT_TABLE);
        let keys: std::collections::HashSet<_> = rows.iter().map(CanonicalRecord::key).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(keys.len(), 3);
        assert_eq!(rows[1].sell_price(), Some(2));
    }

    #[tokio::test]
    async fn test_board_repeated_name_kept_once() {
        let catalog = InstrumentCatalog::builtin();
        let config = LoadConfig::default();
        let board = StaticBoard(
            BoardSnapshot::from_columns(
                vec!["۱۴۰۴/۰۵/۲۱".into(), "۱۴۰۴/۰۵/۲۱".into()],
                vec!["یورو".into(), "یورو".into()],
                vec!["۹۸,۵۰۰".into(), "۹۸,۶۰۰".into()],
            )
            .unwrap(),
        );
        let mut sink = MemorySink::new();

        let report = IncrementalLoad::new(&catalog, &config)
            .run_board(&board, &mut sink)
            .await
            .unwrap();

        assert_eq!(report.appended, 1);
        assert_eq!(sink.rows(DEFAULT_TABLE)[0].sell_price(), Some(98_500));
    }
}
