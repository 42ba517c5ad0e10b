use agent_core::snmp::{self, NodeTarget};
use db::{DueCronEntry, Node, PgPool, Request, ResultRow};
use handlers::HandlerFactory;
use time::OffsetDateTime;

#[derive(Debug, thiserror::Error)]
pub enum TaskRunnerError {
    #[error("database error: {0}")]
    Db(#[from] db::DbError),
    #[error("handler error: {0}")]
    Handler(#[from] handlers::HandlerError),
}

/// Runs one due task invocation end to end: opens a journal, runs Phase 1
/// (raw SNMP capture for every node/request pair), runs Phase 2 (handler
/// dispatch over the accumulated raw data), and closes the journal.
///
/// A failure reaching the database while opening the journal or listing
/// nodes/requests is task-scoped (spec §7): it aborts this invocation,
/// but the cron row is still returned to `ACTIVE` so it is retried on its
/// next due tick, not left stuck in `RUNNING`.
pub async fn run_task(
    pool: &PgPool,
    settings: &agent_core::MonitorSettings,
    entry: &DueCronEntry,
) -> Result<(), TaskRunnerError> {
    let now = OffsetDateTime::now_utc();
    let journal_id = db::open_journal(pool, entry.task_id, now).await?;

    if let Err(e) = db::update_cron_status(pool, entry.cron_id, "RUNNING", Some(journal_id), now).await {
        tracing::warn!(cron_id = entry.cron_id, error = %e, "failed to mark cron RUNNING");
    }

    let outcome = run_task_body(pool, settings, entry, journal_id).await;

    let end = OffsetDateTime::now_utc();
    if let Err(e) = db::close_journal(pool, journal_id, end).await {
        tracing::error!(journal_id, error = %e, "failed to close journal");
    }
    if let Err(e) = db::update_cron_status(pool, entry.cron_id, "ACTIVE", Some(journal_id), end).await {
        tracing::error!(cron_id = entry.cron_id, error = %e, "failed to mark cron ACTIVE");
    }

    outcome
}

/// Phase 1 runs to completion for every `(node, request)` pair in the task
/// — captured, keyed, and batch-inserted — before Phase 2 dispatches a
/// single handler call (spec §5's ordering guarantee: "Phase 2 begins only
/// after Phase 1 has completed for all (node, request) pairs of that
/// task").
async fn run_task_body(
    pool: &PgPool,
    settings: &agent_core::MonitorSettings,
    entry: &DueCronEntry,
    journal_id: i64,
) -> Result<(), TaskRunnerError> {
    let nodes = db::get_nodes_for_group(pool, entry.node_group_id).await?;
    let requests = db::get_requests_for_group(pool, entry.request_group_id).await?;

    // Phase 1 — raw collection. Every pair is captured in memory first;
    // nothing is persisted until the whole task's raw rows are known, so
    // no Phase 2 call can ever see a partially-captured task.
    let mut raw_by_node: Vec<(Node, Vec<ResultRow>)> = Vec::with_capacity(nodes.len());
    let mut all_raw_rows: Vec<ResultRow> = Vec::new();

    for node in nodes {
        let mut node_rows = Vec::with_capacity(requests.len());
        for request in &requests {
            let row = capture_one(settings, &node, request, journal_id).await;
            all_raw_rows.push(row.clone());
            node_rows.push(row);
        }
        raw_by_node.push((node, node_rows));
    }

    db::batch_insert_results(pool, &all_raw_rows).await?;

    // Phase 2 — handler dispatch. Requests with handler id 1 are persisted
    // as raw only, unless the stub override forces every id through a
    // handler (spec §6 handler registry, §9 Open Question (a)).
    if entry.handler_id != 1 || settings.use_stub_handlers {
        let handler = HandlerFactory::create(entry.handler_id, settings.use_stub_handlers)?;
        let mut processed_rows: Vec<ResultRow> = Vec::with_capacity(all_raw_rows.len());

        for (node, node_rows) in &raw_by_node {
            if entry.handler_id == 2 {
                // Legacy combined-MAC handler: one call per node over every
                // raw row the node produced this task (spec §4.4 step 4).
                processed_rows.push(handler.process_raw(pool, node, journal_id, node_rows).await);
            } else {
                // Every other handler: raw rows grouped by (node_id,
                // request_id) — one call per row, since each request
                // currently produces exactly one raw row per node.
                for row in node_rows {
                    let group = std::slice::from_ref(row);
                    processed_rows.push(handler.process_raw(pool, node, journal_id, group).await);
                }
            }
        }

        if let Err(e) = db::batch_insert_results(pool, &processed_rows).await {
            tracing::error!(journal_id, error = %e, "failed to batch-insert processed rows");
        }
    }

    for (node, node_rows) in &raw_by_node {
        if node_rows.iter().any(|r| r.err.is_none()) {
            let now = OffsetDateTime::now_utc();
            if let Err(e) = db::update_node_last_polled(pool, node.id, now).await {
                tracing::warn!(node_id = node.id, error = %e, "failed to stamp node last-polled time");
            }
        }
    }

    Ok(())
}

/// Phase 1 capture for one `(node, request)` pair. Performs the SNMP call
/// and returns the `raw_<name>`/`error_<name>` row to persist; never writes
/// to the database itself — the caller appends every pair's row in one
/// batch insert (spec §4.4 step 3).
async fn capture_one(
    settings: &agent_core::MonitorSettings,
    node: &Node,
    request: &Request,
    journal_id: i64,
) -> ResultRow {
    let target = NodeTarget::new(node.ipaddress.clone(), node.community.clone(), settings.snmp_timeout_ms);
    let start = std::time::Instant::now();

    let capture = capture_raw(target, &request.oid, &request.request_type).await;
    let elapsed_ms = start.elapsed().as_millis() as i32;
    let now = OffsetDateTime::now_utc();

    match capture {
        Ok(entries) => {
            let dotted: Vec<(String, String)> = entries
                .into_iter()
                .map(|(oid, value)| (snmp::format_oid(&oid), value))
                .collect();
            ResultRow {
                node_id: node.id,
                request_id: request.id,
                journal_id,
                val: Some(handlers::raw_codec::encode(&dotted)),
                key: Some(format!("raw_{}", request.name)),
                duration: elapsed_ms,
                err: None,
                dt: now,
            }
        }
        Err(e) => {
            tracing::warn!(node_id = node.id, request_id = request.id, error = %e, "SNMP request failed");
            ResultRow::error(
                node.id,
                request.id,
                journal_id,
                format!("error_{}", request.name),
                e.to_string(),
                elapsed_ms,
                now,
            )
        }
    }
}

/// A request's `oid` column is normally a single dotted OID. A comma-joined
/// list of OIDs (used by the Health request so one GET returns sysName,
/// sysObjectID, and sysUpTime together, spec §8 scenario 1) is issued as
/// one GET per listed OID, with every `(oid, value)` pair folded into the
/// same raw row.
async fn capture_raw(
    target: NodeTarget,
    dotted_oid: &str,
    request_type: &str,
) -> Result<Vec<(Vec<u32>, String)>, snmp::SnmpError> {
    if request_type.eq_ignore_ascii_case("walk") {
        return snmp::walk(target, parse_oid(dotted_oid)).await;
    }

    let mut entries = Vec::new();
    for part in dotted_oid.split(',') {
        let oid = parse_oid(part.trim());
        let outcome = snmp::get(target.clone(), oid).await?;
        entries.push((outcome.oid, outcome.value));
    }
    Ok(entries)
}

fn parse_oid(dotted: &str) -> Vec<u32> {
    dotted.split('.').filter_map(|p| p.parse().ok()).collect()
}
