use crate::{AppState, Effect, Msg, SubmissionId, SubmitError};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::SubmitRequested(raw) => {
            let (next, outcome) = submit(state, raw);
            state = next;
            // Rejections never reach the network; the field error (if any) is on the state.
            outcome.map(|(_, effect)| effect).into_iter().collect()
        }
        Msg::SubmissionFinished {
            submission_id,
            outcome,
        } => {
            state.apply_outcome(submission_id, outcome);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Same transition as `Msg::SubmitRequested`, but hands the caller the
/// rejection reason or the id of the new submission alongside its effect.
pub fn submit(
    mut state: AppState,
    raw: String,
) -> (AppState, Result<(SubmissionId, Effect), SubmitError>) {
    let outcome = state
        .begin_submission(raw)
        .map(|(submission_id, url)| {
            (
                submission_id,
                Effect::SendSummaryRequest { submission_id, url },
            )
        });
    (state, outcome)
}
