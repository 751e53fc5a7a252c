use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::backend::{PdfBackend, RgbaFrame, open_default_backend_with_shared_bytes};
use crate::error::{AppError, AppResult};
use crate::session::{SessionId, render_thumbnail};

/// What a worker should produce. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderJob {
    Page { page: usize, scale: f32 },
    Thumbnail { page: usize },
}

impl RenderJob {
    pub fn page(&self) -> usize {
        match self {
            Self::Page { page, .. } | Self::Thumbnail { page } => *page,
        }
    }

    fn key(&self) -> JobKey {
        match *self {
            Self::Page { page, scale } => JobKey::Page {
                page,
                scale_milli: (scale.max(0.0) * 1000.0).round() as u32,
            },
            Self::Thumbnail { page } => JobKey::Thumbnail { page },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum JobKey {
    Page { page: usize, scale_milli: u32 },
    Thumbnail { page: usize },
}

enum WorkerRequest {
    Job {
        task_id: u64,
        ticket: u64,
        job: RenderJob,
    },
    Shutdown,
}

pub trait RenderDocOpener: Send + Sync {
    fn open_with_shared_bytes(
        &self,
        path: &Path,
        bytes: Arc<Vec<u8>>,
    ) -> AppResult<Box<dyn PdfBackend>>;
}

#[derive(Debug, Default)]
pub struct HayroDocOpener;

impl RenderDocOpener for HayroDocOpener {
    fn open_with_shared_bytes(
        &self,
        path: &Path,
        bytes: Arc<Vec<u8>>,
    ) -> AppResult<Box<dyn PdfBackend>> {
        open_default_backend_with_shared_bytes(path, bytes)
    }
}

#[derive(Debug)]
pub struct RenderOutcome {
    pub session_id: SessionId,
    pub ticket: u64,
    pub job: RenderJob,
    pub result: AppResult<RgbaFrame>,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub(crate) struct WorkerEvent {
    task_id: u64,
    outcome: RenderOutcome,
}

/// Blocking render pool bound to one session's document bytes.
pub struct RenderWorker {
    session_id: SessionId,
    job_tx: flume::Sender<WorkerRequest>,
    result_rx: UnboundedReceiver<WorkerEvent>,
    in_flight: HashMap<JobKey, u64>,
    _runtime: WorkerRuntime,
    workers: Vec<JoinHandle<()>>,
    worker_threads: usize,
    next_task_id: u64,
}

struct WorkerRuntime {
    _owned: Option<Runtime>,
    handle: Handle,
}

impl WorkerRuntime {
    fn new() -> AppResult<Self> {
        if let Ok(handle) = Handle::try_current() {
            return Ok(Self {
                _owned: None,
                handle,
            });
        }

        let runtime = Builder::new_multi_thread()
            .enable_all()
            .thread_name("pdfv-render")
            .build()
            .map_err(|source| AppError::io_with_context(source, "render runtime failed to start"))?;
        let handle = runtime.handle().clone();
        Ok(Self {
            _owned: Some(runtime),
            handle,
        })
    }
}

impl RenderWorker {
    pub fn spawn(
        session_id: SessionId,
        path: PathBuf,
        bytes: Arc<Vec<u8>>,
        worker_threads: usize,
    ) -> AppResult<Self> {
        Self::spawn_with_opener(
            session_id,
            path,
            bytes,
            worker_threads,
            Arc::new(HayroDocOpener),
        )
    }

    pub fn spawn_with_opener(
        session_id: SessionId,
        path: PathBuf,
        bytes: Arc<Vec<u8>>,
        worker_threads: usize,
        opener: Arc<dyn RenderDocOpener>,
    ) -> AppResult<Self> {
        let runtime = WorkerRuntime::new()?;
        let (job_tx, job_rx) = flume::unbounded();
        let (result_tx, result_rx) = unbounded_channel();
        let worker_threads = worker_threads.max(1);

        let mut workers = Vec::with_capacity(worker_threads);
        for _ in 0..worker_threads {
            let path = path.clone();
            let bytes = Arc::clone(&bytes);
            let opener = Arc::clone(&opener);
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            workers.push(runtime.handle.spawn_blocking(move || {
                worker_main(session_id, path, bytes, opener, job_rx, result_tx)
            }));
        }

        debug!(session_id, worker_threads, "render workers started");
        Ok(Self {
            session_id,
            job_tx,
            result_rx,
            in_flight: HashMap::new(),
            _runtime: runtime,
            workers,
            worker_threads,
            next_task_id: 1,
        })
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Queues `job`. Identical jobs already in flight are not queued twice.
    pub fn submit(&mut self, job: RenderJob, ticket: u64) -> bool {
        let key = job.key();
        if self.in_flight.contains_key(&key) {
            return false;
        }
        let task_id = self.next_task_id;
        self.next_task_id = self.next_task_id.saturating_add(1);

        if self
            .job_tx
            .send(WorkerRequest::Job {
                task_id,
                ticket,
                job,
            })
            .is_err()
        {
            return false;
        }
        self.in_flight.insert(key, task_id);
        true
    }

    pub fn is_in_flight(&self, job: &RenderJob) -> bool {
        self.in_flight.contains_key(&job.key())
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn has_page_in_flight(&self) -> bool {
        self.in_flight
            .keys()
            .any(|key| matches!(key, JobKey::Page { .. }))
    }

    fn accept(&mut self, event: WorkerEvent) -> Option<RenderOutcome> {
        let key = event.outcome.job.key();
        match self.in_flight.get(&key) {
            Some(task_id) if *task_id == event.task_id => {
                self.in_flight.remove(&key);
                Some(event.outcome)
            }
            _ => None,
        }
    }

    pub async fn recv(&mut self) -> Option<RenderOutcome> {
        while let Some(event) = self.result_rx.recv().await {
            if let Some(outcome) = self.accept(event) {
                return Some(outcome);
            }
        }
        None
    }

    pub fn try_recv(&mut self) -> Option<RenderOutcome> {
        while let Ok(event) = self.result_rx.try_recv() {
            if let Some(outcome) = self.accept(event) {
                return Some(outcome);
            }
        }
        None
    }

    fn shutdown(&mut self) {
        for _ in 0..self.worker_threads {
            let _ = self.job_tx.send(WorkerRequest::Shutdown);
        }
        while let Some(worker) = self.workers.pop() {
            worker.abort();
        }
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_main(
    session_id: SessionId,
    path: PathBuf,
    bytes: Arc<Vec<u8>>,
    opener: Arc<dyn RenderDocOpener>,
    job_rx: flume::Receiver<WorkerRequest>,
    result_tx: UnboundedSender<WorkerEvent>,
) {
    let doc = opener.open_with_shared_bytes(&path, bytes);
    if let Err(err) = &doc {
        warn!(error = %err, session_id, "render worker could not open document");
    }

    while let Ok(request) = job_rx.recv() {
        let WorkerRequest::Job {
            task_id,
            ticket,
            job,
        } = request
        else {
            break;
        };

        let started = Instant::now();
        let result = match &doc {
            Ok(doc) => run_job(doc.as_ref(), job),
            Err(err) => Err(AppError::unsupported(format!(
                "render worker has no document: {err}"
            ))),
        };
        let elapsed = started.elapsed();
        match &result {
            Ok(frame) => debug!(
                session_id,
                page = job.page(),
                width = frame.width,
                height = frame.height,
                elapsed_ms = elapsed.as_millis() as u64,
                "render finished"
            ),
            Err(err) => warn!(error = %err, session_id, page = job.page(), "render failed"),
        }

        let event = WorkerEvent {
            task_id,
            outcome: RenderOutcome {
                session_id,
                ticket,
                job,
                result,
                elapsed,
            },
        };
        if result_tx.send(event).is_err() {
            break;
        }
    }
}

fn run_job(doc: &dyn PdfBackend, job: RenderJob) -> AppResult<RgbaFrame> {
    match job {
        RenderJob::Page { page, scale } => {
            if page == 0 {
                return Err(AppError::invalid_argument("page index is out of range"));
            }
            doc.render_page(page - 1, scale)
                .map_err(|err| AppError::pdf_render(page, err))
        }
        RenderJob::Thumbnail { page } => {
            render_thumbnail(doc, page).map_err(|err| AppError::pdf_render(page, err))
        }
    }
}
