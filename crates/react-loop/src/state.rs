use react_core::{AgentRun, ConversationHistory, HistoryEntry, RunOutcome};

/// Mutable bookkeeping for a single run.
///
/// Entries produced during an iteration are staged and only reach the
/// history on `commit`, so an interrupted iteration leaves no trace.
#[derive(Debug)]
pub(crate) struct LoopState {
    history: ConversationHistory,
    staged: Vec<HistoryEntry>,
    iteration: usize,
    max_iterations: usize,
    model_turns: usize,
    outcome: Option<RunOutcome>,
}

impl LoopState {
    pub(crate) fn new(user_request: &str, max_iterations: usize) -> Self {
        Self {
            history: ConversationHistory::new(user_request),
            staged: Vec::new(),
            iteration: 0,
            max_iterations,
            model_turns: 0,
            outcome: None,
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.outcome.is_none() && self.iteration < self.max_iterations
    }

    pub(crate) fn iteration(&self) -> usize {
        self.iteration
    }

    pub(crate) fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub(crate) fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub(crate) fn stage_model_turn(&mut self, text: impl Into<String>) {
        self.staged.push(HistoryEntry::ModelTurn(text.into()));
    }

    pub(crate) fn stage_observation(&mut self, text: impl Into<String>) {
        self.staged.push(HistoryEntry::Observation(text.into()));
    }

    /// Moves staged entries into history.
    pub(crate) fn commit(&mut self) {
        for entry in self.staged.drain(..) {
            if matches!(entry, HistoryEntry::ModelTurn(_)) {
                self.model_turns += 1;
            }
            self.history.append(entry);
        }
    }

    /// Commits the iteration and moves on to the next one.
    pub(crate) fn advance(&mut self) {
        self.commit();
        self.iteration += 1;
    }

    /// Ends the run, keeping whatever the current iteration staged.
    pub(crate) fn finish(&mut self, outcome: RunOutcome) {
        self.commit();
        self.outcome = Some(outcome);
    }

    /// Ends the run, dropping the current iteration's staged entries.
    pub(crate) fn interrupt(&mut self, outcome: RunOutcome) {
        self.staged.clear();
        self.outcome = Some(outcome);
    }

    pub(crate) fn into_run(self) -> AgentRun {
        AgentRun {
            outcome: self.outcome.unwrap_or(RunOutcome::Exhausted),
            history: self.history,
            iterations: self.model_turns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use react_core::AbortReason;

    #[test]
    fn zero_budget_is_never_running() {
        let state = LoopState::new("hi", 0);
        assert!(!state.is_running());
        assert_eq!(state.into_run().outcome, RunOutcome::Exhausted);
    }

    #[test]
    fn interrupt_discards_staged_entries() {
        let mut state = LoopState::new("hi", 3);
        state.stage_model_turn("Thought: a\nAction: t()");
        state.stage_observation("ok");
        state.advance();

        state.stage_model_turn("Thought: b\nAction: t()");
        state.interrupt(RunOutcome::Aborted {
            reason: AbortReason::Cancelled,
        });

        let run = state.into_run();
        assert_eq!(run.history.len(), 3);
        assert_eq!(run.iterations, 1);
        assert!(run.outcome.is_aborted());
    }

    #[test]
    fn finish_commits_the_final_turn() {
        let mut state = LoopState::new("hi", 3);
        state.stage_model_turn("Thought: done\nAction: finish(answer=\"x\")");
        state.finish(RunOutcome::Finished {
            answer: "x".to_string(),
        });

        assert!(!state.is_running());
        let run = state.into_run();
        assert_eq!(run.history.len(), 2);
        assert_eq!(run.iterations, 1);
    }

    #[test]
    fn advance_counts_iterations_until_budget() {
        let mut state = LoopState::new("hi", 2);
        for _ in 0..2 {
            assert!(state.is_running());
            state.stage_model_turn("Thought: t\nAction: t()");
            state.stage_observation("o");
            state.advance();
        }
        assert!(!state.is_running());
        assert_eq!(state.iteration(), 2);
        assert_eq!(state.into_run().outcome, RunOutcome::Exhausted);
    }
}
