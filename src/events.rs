use serde::Serialize;
use thiserror::Error;

use crate::catalog::{EventDefinition, EventKind, ResourceKind, Step, StepId, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveEvent {
    pub kind: EventKind,
    pub step: StepId,
}

impl ActiveEvent {
    pub fn definition(&self) -> &'static EventDefinition {
        self.kind.definition()
    }

    pub fn current_step(&self) -> Option<&'static Step> {
        self.definition().step(self.step)
    }

    /// Whether the current step offers `transition` as one of its choices.
    pub fn offers(&self, transition: Transition) -> bool {
        self.current_step()
            .map(|step| step.choices.iter().any(|choice| choice.next == transition))
            .unwrap_or(false)
    }
}

/// Single slot holding the event the world is waiting on.
#[derive(Debug, Clone, Default)]
pub struct EventRuntime {
    active: Option<ActiveEvent>,
}

impl EventRuntime {
    /// Starts `kind` at its entry step and returns whatever it replaced.
    pub fn emit(&mut self, kind: EventKind) -> Option<ActiveEvent> {
        self.active.replace(ActiveEvent {
            kind,
            step: StepId::ENTRY,
        })
    }

    pub fn advance(&mut self, step: StepId) {
        if let Some(active) = self.active.as_mut() {
            active.step = step;
        }
    }

    pub fn clear(&mut self) -> Option<ActiveEvent> {
        self.active.take()
    }

    pub fn active(&self) -> Option<ActiveEvent> {
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_terminal(&self) -> bool {
        self.active.map(|a| a.kind.is_terminal()).unwrap_or(false)
    }
}

/// Can the colony pay for entering `step`? Forced steps always apply, and
/// only negative effects need covering.
pub fn step_affordable(step: &Step, amount: impl Fn(ResourceKind) -> i64) -> bool {
    step.forced
        || step
            .effects
            .iter()
            .filter(|(_, delta)| *delta < 0)
            .all(|(kind, delta)| amount(*kind) >= -delta)
}

/// Figures shown on the Win and Lose screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColonyReport {
    pub days: u64,
    pub people: i64,
    pub minerals: i64,
    pub gas: i64,
    pub science: i64,
}

impl ColonyReport {
    pub fn fill(&self, template: &str) -> String {
        template
            .replace("{days}", &self.days.to_string())
            .replace("{people}", &self.people.to_string())
            .replace("{minerals}", &self.minerals.to_string())
            .replace("{gas}", &self.gas.to_string())
            .replace("{science}", &self.science.to_string())
    }
}

/// One selectable line of the event dialog.
#[derive(Debug, Clone, Serialize)]
pub struct ChoiceView {
    pub number: usize,
    pub label: &'static str,
    pub transition: Transition,
    pub enabled: bool,
}

impl ChoiceView {
    pub fn render(&self) -> String {
        if self.enabled {
            format!("{}. {}", self.number, self.label)
        } else {
            format!("{}. {} (unavailable)", self.number, self.label)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChoiceError {
    #[error("no event is waiting for a choice")]
    NoActiveEvent,
    #[error("choice {0:?} is not offered by the current step")]
    NotOffered(Transition),
    #[error("the colony cannot afford step {0:?}")]
    Unaffordable(StepId),
}

/// What resolving a choice did to the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Advanced(StepId),
    Resumed,
    Restarted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_replaces_the_active_event() {
        let mut runtime = EventRuntime::default();
        assert_eq!(runtime.emit(EventKind::Magnetic), None);
        runtime.advance(StepId(2));
        let replaced = runtime.emit(EventKind::Lose).expect("magnetic was active");
        assert_eq!(replaced.kind, EventKind::Magnetic);
        assert_eq!(replaced.step, StepId(2));
        assert!(runtime.is_terminal());
        assert_eq!(runtime.active().map(|a| a.step), Some(StepId::ENTRY));
    }

    #[test]
    fn forced_steps_ignore_affordability() {
        let magnetic = EventKind::Magnetic.definition();
        let shield = magnetic.step(StepId(1)).unwrap();
        let wiped = magnetic.step(StepId(2)).unwrap();
        assert!(!step_affordable(shield, |_| 0));
        assert!(step_affordable(shield, |_| 20));
        assert!(step_affordable(wiped, |_| 0));
    }

    #[test]
    fn report_fills_every_placeholder() {
        let report = ColonyReport {
            days: 10,
            people: 42,
            minerals: 300,
            gas: 50,
            science: 7,
        };
        let text = report.fill(EventKind::Win.definition().steps[0].text);
        assert!(!text.contains('{'));
        assert!(text.contains("10 days"));
        assert!(text.contains("42 colonists"));
        assert!(text.contains("Science gathered: 7"));
    }
}
