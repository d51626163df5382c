use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::assets::loader::LogoStatus;
use crate::export::ExportFormat;
use crate::foundation::error::{QrError, QrResult};
use crate::render::artifact::RenderedArtifact;
use crate::render::compositor::{LayerOutcome, SkipReason};
use crate::session::engine::QrEngine;
use crate::style::fingerprint::{Fingerprint, fingerprint_request};
use crate::style::spec::StyleSpec;

/// Options controlling [`PreviewController`] scheduling.
#[derive(Clone, Debug)]
pub struct PreviewOpts {
    /// Quiet period after the last edit before a render starts.
    pub debounce: Duration,
    /// How often to check back on a logo that is still loading.
    pub logo_poll_interval: Duration,
}

impl Default for PreviewOpts {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(30),
            logo_poll_interval: Duration::from_millis(16),
        }
    }
}

impl PreviewOpts {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_logo_poll_interval(mut self, interval: Duration) -> Self {
        self.logo_poll_interval = interval;
        self
    }
}

/// Work left in the `Rendering` state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderPhase {
    /// Fetch or encode the base matrix and display it.
    Base,
    /// Run the decoration layers over the displayed base.
    Decorations,
    /// A partial decoration pass is displayed; rerun once the logo finishes loading.
    AwaitingLogo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewState {
    Idle,
    Scheduled { deadline: Instant },
    Rendering(RenderPhase),
}

/// What the preview currently shows.
#[derive(Debug)]
pub enum Displayed {
    Nothing,
    Artifact(Box<RenderedArtifact>),
    /// Rendering failed; the error is shown inline instead of a code.
    Placeholder { content: String, error: QrError },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Asset,
    Font,
    Export,
}

/// Non-fatal problem the host should surface to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

struct Request {
    content: String,
    style: StyleSpec,
    fingerprint: Fingerprint,
    generation: u64,
}

struct DecorationJob {
    generation: u64,
    base: RenderedArtifact,
}

/// Debounced, two-phase live preview over a [`QrEngine`].
///
/// The host owns the clock: it calls [`PreviewController::update`] on every edit and
/// [`PreviewController::tick`] from its loop, waking at [`PreviewController::next_deadline`].
/// A tick does at most one unit of work, so the flat base code is shown before any decoration
/// pass runs. Every edit bumps a generation counter and results from older generations are
/// dropped, so only the latest request is ever displayed.
pub struct PreviewController {
    engine: QrEngine,
    opts: PreviewOpts,
    state: PreviewState,
    generation: u64,
    request: Option<Request>,
    job: Option<DecorationJob>,
    wake_at: Option<Instant>,
    displayed: Displayed,
    notices: Vec<Notice>,
}

impl PreviewController {
    pub fn new(engine: QrEngine, opts: PreviewOpts) -> Self {
        Self {
            engine,
            opts,
            state: PreviewState::Idle,
            generation: 0,
            request: None,
            job: None,
            wake_at: None,
            displayed: Displayed::Nothing,
            notices: Vec::new(),
        }
    }

    pub fn engine(&self) -> &QrEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut QrEngine {
        &mut self.engine
    }

    pub fn state(&self) -> PreviewState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == PreviewState::Idle
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn displayed(&self) -> &Displayed {
        &self.displayed
    }

    pub fn displayed_artifact(&self) -> Option<&RenderedArtifact> {
        match &self.displayed {
            Displayed::Artifact(a) => Some(a.as_ref()),
            _ => None,
        }
    }

    /// Take every notice recorded since the last call.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Record an edit. Returns `false` when it matches the latest request and nothing changes.
    pub fn update(&mut self, content: &str, style: StyleSpec, now: Instant) -> bool {
        let fingerprint = fingerprint_request(content, &style);
        if self
            .request
            .as_ref()
            .is_some_and(|r| r.fingerprint == fingerprint)
        {
            return false;
        }

        self.generation += 1;
        if self.job.take().is_some() {
            tracing::debug!(generation = self.generation, "pending decoration pass superseded");
        }
        self.request = Some(Request {
            content: content.to_string(),
            style,
            fingerprint,
            generation: self.generation,
        });
        let deadline = now + self.opts.debounce;
        self.state = PreviewState::Scheduled { deadline };
        self.wake_at = Some(deadline);
        true
    }

    /// When the host should call [`PreviewController::tick`] next; `None` while idle.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            PreviewState::Idle => None,
            _ => self.wake_at,
        }
    }

    /// Advance the state machine by at most one unit of work. Returns `true` if the displayed
    /// output changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.state {
            PreviewState::Idle => false,
            PreviewState::Scheduled { deadline } => {
                if now < deadline {
                    return false;
                }
                self.state = PreviewState::Rendering(RenderPhase::Base);
                self.run_base_phase(now)
            }
            PreviewState::Rendering(RenderPhase::Base) => self.run_base_phase(now),
            PreviewState::Rendering(RenderPhase::Decorations) => self.run_decoration_pass(now),
            PreviewState::Rendering(RenderPhase::AwaitingLogo) => {
                self.engine.poll_logos();
                let style = self.job.as_ref().map(|j| j.base.style.clone());
                let still_loading = style
                    .and_then(|style| self.engine.logo_status(&style))
                    .is_some_and(|s| matches!(s, LogoStatus::Pending));
                if still_loading {
                    self.wake_at = Some(now + self.opts.logo_poll_interval);
                    return false;
                }
                self.run_decoration_pass(now)
            }
        }
    }

    /// Save the displayed artifact into `dir`.
    ///
    /// Failures are recorded as a notice and returned; the preview itself is left untouched.
    pub fn export(&mut self, format: ExportFormat, dir: &Path) -> QrResult<PathBuf> {
        let res = match &self.displayed {
            Displayed::Artifact(a) => self
                .engine
                .export(a, format)
                .and_then(|file| file.save_to(dir)),
            _ => Err(QrError::export("no rendered code to export")),
        };
        if let Err(e) = &res {
            self.notices.push(Notice::new(NoticeKind::Export, e.to_string()));
        }
        res
    }

    fn current_request(&self) -> Option<&Request> {
        self.request
            .as_ref()
            .filter(|r| r.generation == self.generation)
    }

    fn run_base_phase(&mut self, now: Instant) -> bool {
        let Some(req) = self.current_request() else {
            self.state = PreviewState::Idle;
            return false;
        };
        let generation = req.generation;
        let content = req.content.clone();
        let style = req.style.clone();

        match self.engine.render_base(&content, &style) {
            Ok(base) => {
                if style.has_decorations() {
                    self.job = Some(DecorationJob {
                        generation,
                        base: base.clone(),
                    });
                    self.state = PreviewState::Rendering(RenderPhase::Decorations);
                    self.wake_at = Some(now);
                } else {
                    self.state = PreviewState::Idle;
                }
                self.displayed = Displayed::Artifact(Box::new(base));
            }
            Err(error) => {
                tracing::warn!(generation, error = %error, "render failed; showing placeholder");
                self.displayed = Displayed::Placeholder { content, error };
                self.state = PreviewState::Idle;
            }
        }
        true
    }

    fn run_decoration_pass(&mut self, now: Instant) -> bool {
        let Some(job) = self.job.take() else {
            self.state = PreviewState::Idle;
            return false;
        };
        let logo = self.engine.logo_status(&job.base.style);
        let result = self.engine.decorate(&job.base, logo.as_ref());

        if job.generation != self.generation {
            tracing::debug!(
                pass = job.generation,
                latest = self.generation,
                "stale decoration pass discarded"
            );
            return false;
        }

        let artifact = match result {
            Ok(a) => a,
            Err(error) => {
                tracing::warn!(error = %error, "decoration pass failed; showing placeholder");
                self.displayed = Displayed::Placeholder {
                    content: job.base.content.clone(),
                    error,
                };
                self.state = PreviewState::Idle;
                return true;
            }
        };

        if matches!(logo, Some(LogoStatus::Pending)) {
            self.job = Some(job);
            self.state = PreviewState::Rendering(RenderPhase::AwaitingLogo);
            self.wake_at = Some(now + self.opts.logo_poll_interval);
        } else {
            self.record_layer_notices(&artifact);
            self.state = PreviewState::Idle;
        }
        self.displayed = Displayed::Artifact(Box::new(artifact));
        true
    }

    fn record_layer_notices(&mut self, artifact: &RenderedArtifact) {
        for report in &artifact.layers {
            match &report.outcome {
                LayerOutcome::Skipped(SkipReason::LogoFailed(msg)) => {
                    self.notices
                        .push(Notice::new(NoticeKind::Asset, format!("logo skipped: {msg}")));
                }
                LayerOutcome::Degraded(msg) => {
                    self.notices.push(Notice::new(NoticeKind::Font, msg.clone()));
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/preview.rs"]
mod tests;
