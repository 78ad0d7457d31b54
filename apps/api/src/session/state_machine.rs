//! The session's view model as a pure reducer.
//!
//! `reduce` never performs I/O. When a transition needs the analysis engine it
//! returns `Effect::RequestAnalysis`; `SessionController` runs the effect and
//! feeds the outcome back as `AnalysisSucceeded` / `AnalysisFailed`.
//!
//! ```text
//! landing --GetStarted--> upload --Submit--> analyzing --AnalysisSucceeded--> result
//!    ^                     |  ^                  |                              |
//!    +-------GoHome--------+  +--AnalysisFailed--+                              |
//!    +<------------------------------Reset (reset target)-----------------------+
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::models::{AnalysisRequest, AnalysisResult, ExperienceLevel};
use crate::analysis::roles::{default_role, resolve_target_role};

pub const EMPTY_RESUME_MESSAGE: &str = "Resume content is required.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Landing,
    Upload,
    Analyzing,
    Result,
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewState::Landing => "landing",
            ViewState::Upload => "upload",
            ViewState::Analyzing => "analyzing",
            ViewState::Result => "result",
        };
        f.write_str(name)
    }
}

/// Everything one user session shows. Replaced wholesale on every transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub view: ViewState,
    /// Editable working copy of the resume, from upload or typing.
    pub resume_text: String,
    pub selected_role: String,
    pub custom_role: String,
    pub experience_level: ExperienceLevel,
    /// Only ever `Some` while `view == Result`.
    pub analysis: Option<AnalysisResult>,
    pub error: Option<String>,
    /// An upload is being decoded.
    pub parsing: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            view: ViewState::Landing,
            resume_text: String::new(),
            selected_role: default_role().to_string(),
            custom_role: String::new(),
            experience_level: ExperienceLevel::default(),
            analysis: None,
            error: None,
            parsing: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    GetStarted,
    GoHome,
    EditText(String),
    SelectRole(String),
    SetCustomRole(String),
    SelectExperienceLevel(ExperienceLevel),
    ParsingStarted,
    ParsingSucceeded(String),
    ParsingFailed(String),
    Submit,
    AnalysisSucceeded(AnalysisResult),
    AnalysisFailed(String),
    Reset,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::GetStarted => "get_started",
            Action::GoHome => "go_home",
            Action::EditText(_) => "edit_text",
            Action::SelectRole(_) => "select_role",
            Action::SetCustomRole(_) => "set_custom_role",
            Action::SelectExperienceLevel(_) => "select_experience_level",
            Action::ParsingStarted => "parsing_started",
            Action::ParsingSucceeded(_) => "parsing_succeeded",
            Action::ParsingFailed(_) => "parsing_failed",
            Action::Submit => "submit",
            Action::AnalysisSucceeded(_) => "analysis_succeeded",
            Action::AnalysisFailed(_) => "analysis_failed",
            Action::Reset => "reset",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    RequestAnalysis(AnalysisRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: SessionState,
    pub effect: Effect,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransitionError {
    #[error("'{action}' is not allowed in the '{view}' view")]
    NotAllowed {
        action: &'static str,
        view: ViewState,
    },

    #[error("An analysis is already in progress")]
    AnalysisInFlight,

    #[error("A file is still being processed")]
    ParsingInFlight,
}

/// Applies one action. `reset_target` is where `Reset` lands (landing or upload).
pub fn reduce(
    state: &SessionState,
    action: Action,
    reset_target: ViewState,
) -> Result<Transition, TransitionError> {
    let mut next = state.clone();
    let mut effect = Effect::None;

    match (state.view, action) {
        (ViewState::Landing, Action::GetStarted) => {
            next.view = ViewState::Upload;
        }
        (ViewState::Upload, Action::GoHome) => {
            if state.parsing {
                return Err(TransitionError::ParsingInFlight);
            }
            next.view = ViewState::Landing;
        }
        (ViewState::Upload, Action::EditText(text)) => {
            next.resume_text = text;
        }
        (ViewState::Upload, Action::SelectRole(role)) => {
            next.selected_role = role;
        }
        (ViewState::Upload, Action::SetCustomRole(role)) => {
            next.custom_role = role;
        }
        (ViewState::Upload, Action::SelectExperienceLevel(level)) => {
            next.experience_level = level;
        }
        (ViewState::Upload, Action::ParsingStarted) => {
            if state.parsing {
                return Err(TransitionError::ParsingInFlight);
            }
            next.parsing = true;
            next.error = None;
        }
        (ViewState::Upload, Action::ParsingSucceeded(text)) => {
            next.parsing = false;
            next.resume_text = text;
        }
        (ViewState::Upload, Action::ParsingFailed(message)) => {
            next.parsing = false;
            next.error = Some(message);
        }
        (ViewState::Upload, Action::Submit) => {
            if state.parsing {
                return Err(TransitionError::ParsingInFlight);
            }
            if state.resume_text.trim().is_empty() {
                next.error = Some(EMPTY_RESUME_MESSAGE.to_string());
            } else {
                next.error = None;
                next.view = ViewState::Analyzing;
                effect = Effect::RequestAnalysis(AnalysisRequest {
                    resume_text: state.resume_text.clone(),
                    target_role: resolve_target_role(&state.selected_role, &state.custom_role),
                    experience_level: state.experience_level,
                });
            }
        }
        (ViewState::Analyzing, Action::Submit | Action::Reset) => {
            return Err(TransitionError::AnalysisInFlight);
        }
        (ViewState::Analyzing, Action::AnalysisSucceeded(analysis)) => {
            next.view = ViewState::Result;
            next.analysis = Some(analysis);
        }
        (ViewState::Analyzing, Action::AnalysisFailed(message)) => {
            next.view = ViewState::Upload;
            next.error = Some(message);
        }
        (_, Action::Reset) => {
            if state.parsing {
                return Err(TransitionError::ParsingInFlight);
            }
            next.view = reset_target;
            next.analysis = None;
            next.resume_text.clear();
            next.error = None;
        }
        (view, action) => {
            return Err(TransitionError::NotAllowed {
                action: action.name(),
                view,
            });
        }
    }

    Ok(Transition {
        state: next,
        effect,
    })
}
