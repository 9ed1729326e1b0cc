//! Photo session driving the compositing pipeline
//!
//! The session owns the cross-call invariant of the whole system: the cutout
//! is computed once per subject and reused across frame switches, so merge
//! and overlay are re-runnable without re-invoking removal. It also owns the
//! pipeline state machine and guarantees that no stale composite is ever
//! observable as current after a failure.
//!
//! Session methods take `&mut self`, so a second merge/overlay cannot start
//! while one is in flight; completion order is request order by construction.

use crate::{
    assets::AssetStore,
    compose::Compositor,
    config::BoothConfig,
    error::{BoothError, Result},
    frame::{FrameCatalog, FrameDescriptor},
    payload::ImagePayload,
    removal::{BackgroundRemovalService, ClipdropClient},
};
use instant::Instant;
use log::{debug, info};
use tracing::instrument;

/// Pipeline state across the three operations.
///
/// `Idle → Removing → Merging → (Overlaying if the frame has a foreground)
/// → Done`, with any stage's failure transitioning to `Failed` and aborting
/// the remaining stages. Frame selection in `Done` re-enters at `Merging`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// No pipeline has run yet (or the session was reset)
    Idle,
    /// Awaiting the remote background-removal call
    Removing,
    /// Compositing the cutout onto the frame background
    Merging,
    /// Layering the frame foreground over the merge result
    Overlaying,
    /// A final composite is available
    Done,
    /// The last invocation failed; no composite is available
    Failed,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Removing => write!(f, "removing"),
            Self::Merging => write!(f, "merging"),
            Self::Overlaying => write!(f, "overlaying"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Wall-clock stage timings for the last pipeline invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineTimings {
    /// Background removal time (zero when the cached cutout was reused)
    pub removal_ms: u64,
    /// Background merge time
    pub merge_ms: u64,
    /// Foreground overlay time (zero when the frame has no foreground)
    pub overlay_ms: u64,
    /// Total invocation time
    pub total_ms: u64,
}

/// A photobooth session: one subject, one cached cutout, switchable frames.
pub struct PhotoSession {
    remover: Box<dyn BackgroundRemovalService>,
    compositor: Compositor,
    catalog: FrameCatalog,
    state: PipelineState,
    cutout: Option<ImagePayload>,
    selected_frame: Option<String>,
    result: Option<ImagePayload>,
    timings: PipelineTimings,
}

impl PhotoSession {
    /// Create a session from its parts.
    #[must_use]
    pub fn new(
        remover: Box<dyn BackgroundRemovalService>,
        compositor: Compositor,
        catalog: FrameCatalog,
    ) -> Self {
        Self {
            remover,
            compositor,
            catalog,
            state: PipelineState::Idle,
            cutout: None,
            selected_frame: None,
            result: None,
            timings: PipelineTimings::default(),
        }
    }

    /// Create a session against the remote removal service, the built-in
    /// frame catalog, and the configured assets root.
    ///
    /// # Errors
    /// - Missing API key
    /// - Unknown default frame
    /// - HTTP client construction failure
    pub fn from_config(config: &BoothConfig) -> Result<Self> {
        config.validate()?;
        let catalog = FrameCatalog::builtin();
        catalog.require(&config.default_frame)?;

        let api_key = config.api_key.as_deref().ok_or_else(|| {
            BoothError::invalid_config("an API key is required for remote background removal")
        })?;
        let remover = ClipdropClient::with_endpoint(api_key, config.endpoint.clone())?;
        let compositor = Compositor::new(AssetStore::new(config.assets_root.clone()));

        Ok(Self::new(Box::new(remover), compositor, catalog))
    }

    /// Run the full pipeline for a subject photo: removal, merge, and the
    /// overlay stage when the frame carries a foreground.
    ///
    /// The resulting cutout is cached for subsequent [`switch_frame`] calls.
    ///
    /// [`switch_frame`]: PhotoSession::switch_frame
    ///
    /// # Errors
    /// - Any stage failure; the session transitions to `Failed` and the
    ///   previous composite is cleared
    #[instrument(level = "debug", skip_all, fields(frame_id = %frame_id))]
    pub async fn print(&mut self, photo: &ImagePayload, frame_id: &str) -> Result<ImagePayload> {
        let frame = self.catalog.require(frame_id)?.clone();
        info!("printing photo with frame '{}'", frame.id);

        self.result = None;
        self.timings = PipelineTimings::default();
        let started = Instant::now();

        self.state = PipelineState::Removing;
        let removal_started = Instant::now();
        let cutout = match self.remover.remove_background(photo).await {
            Ok(cutout) => cutout,
            Err(e) => return Err(self.fail(e)),
        };
        self.timings.removal_ms = elapsed_ms(removal_started);
        self.cutout = Some(cutout.clone());

        let composite = match self.render(&cutout, &frame).await {
            Ok(composite) => composite,
            Err(e) => return Err(self.fail(e)),
        };

        self.timings.total_ms = elapsed_ms(started);
        self.finish(frame.id, composite.clone());
        Ok(composite)
    }

    /// Re-render the cached cutout against another frame, bypassing removal.
    ///
    /// # Errors
    /// - No cutout has been produced yet
    /// - Any merge/overlay failure; the session transitions to `Failed` and
    ///   the previous composite is cleared
    #[instrument(level = "debug", skip_all, fields(frame_id = %frame_id))]
    pub async fn switch_frame(&mut self, frame_id: &str) -> Result<ImagePayload> {
        let frame = self.catalog.require(frame_id)?.clone();
        let cutout = self.cutout.clone().ok_or_else(|| {
            BoothError::invalid_config("no cutout available; print a photo first")
        })?;
        debug!("switching frame to '{}' against cached cutout", frame.id);

        self.result = None;
        self.timings = PipelineTimings::default();
        let started = Instant::now();

        let composite = match self.render(&cutout, &frame).await {
            Ok(composite) => composite,
            Err(e) => return Err(self.fail(e)),
        };

        self.timings.total_ms = elapsed_ms(started);
        self.finish(frame.id, composite.clone());
        Ok(composite)
    }

    /// Merge, then overlay when the frame carries a foreground layer.
    async fn render(
        &mut self,
        cutout: &ImagePayload,
        frame: &FrameDescriptor,
    ) -> Result<ImagePayload> {
        self.state = PipelineState::Merging;
        let merge_started = Instant::now();
        let merged = self
            .compositor
            .merge_with_background(cutout, &frame.background, frame.placement)
            .await?;
        self.timings.merge_ms = elapsed_ms(merge_started);

        let Some(foreground) = &frame.foreground else {
            return Ok(merged);
        };

        self.state = PipelineState::Overlaying;
        let overlay_started = Instant::now();
        let composite = self.compositor.overlay_foreground(&merged, foreground).await?;
        self.timings.overlay_ms = elapsed_ms(overlay_started);
        Ok(composite)
    }

    fn finish(&mut self, frame_id: String, composite: ImagePayload) {
        self.selected_frame = Some(frame_id);
        self.result = Some(composite);
        self.state = PipelineState::Done;
    }

    /// Record the failure; the cleared result never shows a prior composite
    /// as if it were current.
    fn fail(&mut self, error: BoothError) -> BoothError {
        log::warn!("pipeline failed while {}: {}", self.state, error);
        self.state = PipelineState::Failed;
        self.result = None;
        error
    }

    /// Discard the subject, cutout, and composite for a fresh capture.
    pub fn reset(&mut self) {
        self.state = PipelineState::Idle;
        self.cutout = None;
        self.selected_frame = None;
        self.result = None;
        self.timings = PipelineTimings::default();
    }

    /// Current pipeline state.
    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// The cached cutout, once removal has succeeded.
    #[must_use]
    pub fn cutout(&self) -> Option<&ImagePayload> {
        self.cutout.as_ref()
    }

    /// Identifier of the frame the current composite was rendered with.
    #[must_use]
    pub fn selected_frame(&self) -> Option<&str> {
        self.selected_frame.as_deref()
    }

    /// The current final composite, when the pipeline is `Done`.
    #[must_use]
    pub fn result(&self) -> Option<&ImagePayload> {
        self.result.as_ref()
    }

    /// Stage timings of the last invocation.
    #[must_use]
    pub fn timings(&self) -> PipelineTimings {
        self.timings
    }

    /// The frame catalog this session selects from.
    #[must_use]
    pub fn catalog(&self) -> &FrameCatalog {
        &self.catalog
    }
}

fn elapsed_ms(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX)
}

impl std::fmt::Debug for PhotoSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoSession")
            .field("state", &self.state)
            .field("selected_frame", &self.selected_frame)
            .field("has_cutout", &self.cutout.is_some())
            .field("has_result", &self.result.is_some())
            .finish()
    }
}
