//! Drives the session reducer: applies actions, runs the effects the reducer
//! asks for, and feeds their outcome back in.
//!
//! Collaborator failures (extraction, analysis) never fail the call. They end
//! up as `SessionState::error`, with the session back in an interactive view.
//!
//! Slow work and the transition recording its outcome run on a spawned task.
//! The caller only awaits the join handle, so a dropped request cannot leave
//! a session stuck in `analyzing` or `parsing`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::analysis::models::AnalysisRequest;
use crate::analysis::requester::AnalysisRequester;
use crate::errors::AppError;
use crate::extraction::{ResumeDocument, TextExtractor};
use crate::session::state_machine::{
    reduce, Action, Effect, SessionState, Transition, ViewState,
};
use crate::session::store::SessionStore;

#[derive(Clone)]
pub struct SessionController {
    store: SessionStore,
    extractor: Arc<dyn TextExtractor>,
    requester: Arc<dyn AnalysisRequester>,
    reset_target: ViewState,
}

impl SessionController {
    pub fn new(
        store: SessionStore,
        extractor: Arc<dyn TextExtractor>,
        requester: Arc<dyn AnalysisRequester>,
        reset_target: ViewState,
    ) -> Self {
        Self {
            store,
            extractor,
            requester,
            reset_target,
        }
    }

    pub async fn create(&self) -> (Uuid, SessionState) {
        let (id, state) = self.store.create().await;
        info!(session_id = %id, "session created");
        (id, state)
    }

    pub async fn get(&self, id: Uuid) -> Result<SessionState, AppError> {
        self.store.get(id).await
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.store.remove(id).await
    }

    pub async fn active_sessions(&self) -> usize {
        self.store.len().await
    }

    pub fn spawn_idle_sweeper(&self, every: Duration) -> JoinHandle<()> {
        self.store.spawn_idle_sweeper(every)
    }

    /// Applies one action and runs whatever effect it produced.
    pub async fn dispatch(&self, id: Uuid, action: Action) -> Result<SessionState, AppError> {
        let transition = self.apply(id, action).await?;
        match transition.effect {
            Effect::None => Ok(transition.state),
            Effect::RequestAnalysis(request) => {
                let controller = self.clone();
                detach(async move { controller.run_analysis(id, request).await }).await
            }
        }
    }

    /// Submit the working text for analysis. Resolves once the session has
    /// left `analyzing` (or never entered it).
    pub async fn submit(&self, id: Uuid) -> Result<SessionState, AppError> {
        self.dispatch(id, Action::Submit).await
    }

    /// Extracts an uploaded file into the session's working text.
    pub async fn upload(&self, id: Uuid, document: ResumeDocument) -> Result<SessionState, AppError> {
        self.apply(id, Action::ParsingStarted).await?;
        let controller = self.clone();
        detach(async move { controller.finish_upload(id, document).await }).await
    }

    async fn apply(&self, id: Uuid, action: Action) -> Result<Transition, AppError> {
        let name = action.name();
        let reset_target = self.reset_target;
        let transition = self
            .store
            .apply(id, |state| reduce(state, action, reset_target))
            .await?;
        debug!(session_id = %id, action = name, view = %transition.state.view, "transition");
        Ok(transition)
    }

    async fn finish_upload(
        &self,
        id: Uuid,
        document: ResumeDocument,
    ) -> Result<SessionState, AppError> {
        let outcome = match self.extractor.extract(document).await {
            Ok(text) => Action::ParsingSucceeded(text),
            Err(e) => {
                warn!(session_id = %id, "upload extraction failed: {e}");
                Action::ParsingFailed(e.to_string())
            }
        };
        Ok(self.apply(id, outcome).await?.state)
    }

    async fn run_analysis(
        &self,
        id: Uuid,
        request: AnalysisRequest,
    ) -> Result<SessionState, AppError> {
        let outcome = match self.requester.request_analysis(&request).await {
            Ok(analysis) => {
                info!(session_id = %id, score = analysis.ats_score, "analysis complete");
                Action::AnalysisSucceeded(analysis)
            }
            Err(e) => {
                warn!(session_id = %id, "analysis failed: {e}");
                Action::AnalysisFailed(e.to_string())
            }
        };
        // Outcome actions never carry an effect.
        Ok(self.apply(id, outcome).await?.state)
    }
}

/// Runs `work` to completion on its own task, whether or not the caller is
/// still waiting for it.
async fn detach<F>(work: F) -> Result<SessionState, AppError>
where
    F: Future<Output = Result<SessionState, AppError>> + Send + 'static,
{
    tokio::spawn(work).await.map_err(|e| {
        error!("session task did not complete: {e}");
        AppError::Internal(anyhow::anyhow!("session task did not complete: {e}"))
    })?
}
