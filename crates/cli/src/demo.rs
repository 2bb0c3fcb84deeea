//! Producer/consumer rounds that exercise every capability level.

use crate::payload::{Journal, Trace};
use refcap_core::{
    ManagedStack, OwnedHandle, ReadOnlyHandle, RefCapError, RefCapResult, SharedHandle,
};
use serde::Serialize;

/// Source: allocates a payload and hands ownership to the caller.
pub fn produce(journal: &Journal) -> OwnedHandle<Trace> {
    OwnedHandle::create(Trace::new(journal))
}

/// Reads only.
pub fn look(payload: ReadOnlyHandle<'_, Trace>) {
    payload.inspect();
    tracing::debug!(instance = payload.instance(), touches = payload.touches(), "looked");
}

/// Mutates, then passes a narrowed view on.
pub fn modify(mut payload: SharedHandle<'_, Trace>) {
    payload.touch();
    look(payload.read_only());
}

/// Sink: takes ownership; the payload is freed when this returns.
pub fn consume(mut payload: OwnedHandle<Trace>) -> RefCapResult<()> {
    modify(payload.share()?);
    Ok(())
}

/// One round: produce, share, push into the stack, lend the top, then
/// produce a second payload into the moved-from handle and consume it.
pub fn run_round(
    stack: &mut SharedHandle<'_, ManagedStack<Trace>>,
    journal: &Journal,
) -> RefCapResult<()> {
    let mut x = produce(journal);
    modify(x.share()?);

    stack.push(OwnedHandle::move_from(&mut x)?)?;

    modify(stack.top()?);
    look(stack.peek()?);

    x.move_assign(&mut produce(journal))?;
    consume(OwnedHandle::move_from(&mut x)?)
}

/// Runs `loops` rounds against a stack that is itself behind an owner.
///
/// Returns the stack depth after the last round; the stack and its contents
/// are freed before returning.
pub fn run(loops: u32, journal: &Journal) -> RefCapResult<usize> {
    let mut owner = OwnedHandle::create(ManagedStack::new());

    for round in 0..loops {
        tracing::info!(round, "loop");
        run_round(&mut owner.share()?, journal)?;
    }

    let depth = owner.get()?.len();
    tracing::info!(depth, "loop ended");
    Ok(depth)
}

/// Observations from the push/mutate/pop walkthrough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioOutcome {
    pub handle: u64,
    pub created: i32,
    pub moved_out_error: Option<String>,
    pub top_before: i32,
    pub popped: i32,
}

/// `create(5)`, move it into a stack, mutate the top to 6, pop it back out.
pub fn scenario() -> RefCapResult<ScenarioOutcome> {
    let mut stack = ManagedStack::new();
    let mut h = OwnedHandle::create(5);
    let handle = h.id().get();
    let created = *h.get()?;

    stack.push(OwnedHandle::move_from(&mut h)?)?;
    let moved_out_error = match h.access() {
        Ok(_) => None,
        Err(e @ RefCapError::UseAfterMove { .. }) => Some(e.to_string()),
        Err(e) => return Err(e),
    };

    let top_before = {
        let mut top = stack.top()?;
        let before = *top.get();
        *top.access() = before + 1;
        before
    };

    let popped = stack.pop()?.into_inner()?;
    Ok(ScenarioOutcome {
        handle,
        created,
        moved_out_error,
        top_before,
        popped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::EventKind;

    #[test]
    fn rounds_free_everything() {
        let journal = Journal::new();
        let depth = run(2, &journal).unwrap();
        assert_eq!(depth, 2);
        assert_eq!(journal.count(EventKind::Constructed), 4);
        assert_eq!(journal.count(EventKind::Dropped), 4);
        assert_eq!(journal.count(EventKind::Cloned), 0);
        assert_eq!(journal.live(), 0);
    }

    #[test]
    fn consumed_payload_dropped_within_round() {
        let journal = Journal::new();
        let mut owner = OwnedHandle::create(ManagedStack::new());
        run_round(&mut owner.share().unwrap(), &journal).unwrap();
        // The consumed payload is gone; the stacked one is still alive.
        assert_eq!(journal.live(), 1);
        let stacked = owner.get().unwrap().peek().unwrap();
        assert_eq!(stacked.touches(), 2);
    }

    #[test]
    fn scenario_matches_walkthrough() {
        let outcome = scenario().unwrap();
        assert_eq!(outcome.created, 5);
        assert_eq!(outcome.top_before, 5);
        assert_eq!(outcome.popped, 6);
        let err = outcome.moved_out_error.unwrap();
        assert!(err.starts_with("use after move: access"));
        assert!(err.ends_with(&format!("#{}", outcome.handle)));
    }
}
