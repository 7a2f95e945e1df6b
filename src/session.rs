//! A single map session: the snapshot is fetched once, then the display mode
//! can be switched as often as the user likes.

use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;
use projector::{
    compute_summary, DisplayMode, DisplayPoint, Projector, RawDataset, SummaryStats,
};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

use crate::{
    config::ProjectionConfig,
    error::{Error, ErrorKind},
    observer::{Stage, StageObserver},
    source::DatasetSource,
};

/// What the front end can ask about the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Status {
    Loading,
    Ready { mode: DisplayMode, points: usize },
    Failed { kind: ErrorKind, error: String },
}

#[derive(Debug)]
pub struct Session {
    projector: Projector,
    projection: ProjectionConfig,
    observer: Box<dyn StageObserver>,
    rng: Mutex<StdRng>,
    state: RwLock<State>,
}

#[derive(Debug)]
enum State {
    Loading,
    // The single fetch is in flight.
    Fetching,
    Ready(View),
    Failed(Failure),
}

#[derive(Debug)]
struct View {
    dataset: Arc<RawDataset>,
    summary: SummaryStats,
    mode: DisplayMode,
    points: Arc<Vec<DisplayPoint>>,
}

// Errors are not `Clone`, so a terminal failure is kept as its kind and message.
#[derive(Debug, Clone)]
struct Failure {
    kind: ErrorKind,
    detail: String,
}

impl Failure {
    fn to_error(&self) -> Error {
        match self.kind {
            ErrorKind::DatasetParse => Error::DatasetParse(self.detail.clone()),
            _ => Error::DatasetFetch(self.detail.clone()),
        }
    }
}

impl Session {
    /// Create a session in the loading state. The sampler is seeded from the
    /// configuration if a seed is set.
    pub fn new(
        projection: ProjectionConfig,
        observer: impl StageObserver + 'static,
    ) -> Result<Self, Error> {
        let rng = match projection.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(projection, rng, observer)
    }

    pub fn with_rng(
        projection: ProjectionConfig,
        rng: StdRng,
        observer: impl StageObserver + 'static,
    ) -> Result<Self, Error> {
        Ok(Self {
            projector: projection.projector()?,
            projection,
            observer: Box::new(observer),
            rng: Mutex::new(rng),
            state: RwLock::new(State::Loading),
        })
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Fetch the snapshot and show its observed nodes.
    ///
    /// There is a single attempt: a failure leaves the session failed for good.
    /// Calling this again once the fetch has started does not fetch anything:
    /// a call made while the fetch is in flight gets `Error::NotReady`.
    pub async fn load(&self, source: &dyn DatasetSource) -> Result<SummaryStats, Error> {
        let claimed = {
            let mut state = self.write_state();
            match *state {
                State::Loading => {
                    *state = State::Fetching;
                    true
                }
                _ => false,
            }
        };
        if !claimed {
            debug!("Dataset already requested, ignoring reload");
            return self.summary();
        }

        match source.load().await {
            Ok(dataset) => Ok(self.install(dataset)),
            Err(err) => {
                let failure = Failure {
                    kind: err.kind(),
                    detail: err.to_string(),
                };
                *self.write_state() = State::Failed(failure.clone());
                self.emit_error(failure.kind, failure.detail);
                Err(err)
            }
        }
    }

    // The summary is computed here and nowhere else.
    fn install(&self, dataset: RawDataset) -> SummaryStats {
        let summary = compute_summary(&dataset);
        let records = dataset.nodes.len();
        let dataset = Arc::new(dataset);
        let mode = DisplayMode::Observed;
        let computed = self.project(&dataset, mode);

        let points = match &computed {
            Ok(points) => points.clone(),
            Err(_) => Arc::new(Vec::new()),
        };
        let count = points.len();
        *self.write_state() = State::Ready(View {
            dataset,
            summary,
            mode,
            points,
        });

        self.observer.stage_reached(&Stage::DatasetLoaded {
            total_nodes: summary.total_nodes,
            records,
            timestamp: summary.timestamp,
        });
        match computed {
            Ok(_) => self.observer.stage_reached(&Stage::ModeChanged { mode, points: count }),
            Err(err) => self.emit_error(err.kind(), err.to_string()),
        }

        summary
    }

    /// Switch the display mode and recompute the points.
    ///
    /// Returns `Ok(None)` while the dataset is still loading: the request is
    /// dropped, not queued. If no node can be placed on the map the new mode
    /// is kept with no points and the error is returned.
    pub fn select_mode(&self, mode: DisplayMode) -> Result<Option<Arc<Vec<DisplayPoint>>>, Error> {
        let mut state = self.write_state();
        let view = match &mut *state {
            State::Loading | State::Fetching => {
                debug!("Dataset not loaded yet, ignoring mode {mode}");
                return Ok(None);
            }
            State::Failed(failure) => return Err(failure.to_error()),
            State::Ready(view) => view,
        };

        if view.mode == mode && !view.points.is_empty() {
            return Ok(Some(view.points.clone()));
        }

        let computed = self.project(&view.dataset, mode);
        view.mode = mode;
        view.points = match &computed {
            Ok(points) => points.clone(),
            Err(_) => Arc::new(Vec::new()),
        };
        drop(state);

        match computed {
            Ok(points) => {
                self.observer.stage_reached(&Stage::ModeChanged {
                    mode,
                    points: points.len(),
                });
                Ok(Some(points))
            }
            Err(err) => {
                self.emit_error(err.kind(), err.to_string());
                Err(err)
            }
        }
    }

    /// The points `mode` would show, without making it the active mode.
    ///
    /// Asking for the active mode returns its current points. Any other mode is
    /// sampled afresh on each call and nothing is stored or reported.
    pub fn preview(&self, mode: DisplayMode) -> Result<Arc<Vec<DisplayPoint>>, Error> {
        let dataset = match &*self.read_state() {
            State::Loading | State::Fetching => return Err(Error::NotReady),
            State::Failed(failure) => return Err(failure.to_error()),
            State::Ready(view) if view.mode == mode => return Ok(view.points.clone()),
            State::Ready(view) => view.dataset.clone(),
        };

        self.project(&dataset, mode)
    }

    /// Record that the map widget could not be created. The data side of the
    /// session is left as it is.
    pub fn report_render_error(&self, detail: &str) -> Error {
        let err = Error::RenderingInit(detail.to_string());
        self.emit_error(err.kind(), err.to_string());
        err
    }

    pub fn summary(&self) -> Result<SummaryStats, Error> {
        match &*self.read_state() {
            State::Loading | State::Fetching => Err(Error::NotReady),
            State::Failed(failure) => Err(failure.to_error()),
            State::Ready(view) => Ok(view.summary),
        }
    }

    /// The active mode and its points.
    pub fn points(&self) -> Result<(DisplayMode, Arc<Vec<DisplayPoint>>), Error> {
        match &*self.read_state() {
            State::Loading | State::Fetching => Err(Error::NotReady),
            State::Failed(failure) => Err(failure.to_error()),
            State::Ready(view) => Ok((view.mode, view.points.clone())),
        }
    }

    pub fn mode(&self) -> Option<DisplayMode> {
        match &*self.read_state() {
            State::Ready(view) => Some(view.mode),
            _ => None,
        }
    }

    pub fn status(&self) -> Status {
        match &*self.read_state() {
            State::Loading | State::Fetching => Status::Loading,
            State::Ready(view) => Status::Ready {
                mode: view.mode,
                points: view.points.len(),
            },
            State::Failed(failure) => Status::Failed {
                kind: failure.kind,
                error: failure.detail.clone(),
            },
        }
    }

    fn project(
        &self,
        dataset: &RawDataset,
        mode: DisplayMode,
    ) -> Result<Arc<Vec<DisplayPoint>>, Error> {
        let max_points = self.projection.max_points(mode);
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let points = self
            .projector
            .compute_display_points(dataset, mode, max_points, &mut *rng)?;

        Ok(Arc::new(points))
    }

    fn emit_error(&self, kind: ErrorKind, detail: String) {
        self.observer
            .stage_reached(&Stage::ErrorOccurred { kind, detail });
    }

    fn read_state(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}
