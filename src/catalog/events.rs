use serde::{Deserialize, Serialize};

use super::ResourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Start,
    Win,
    Lose,
    Magnetic,
    Toxic,
    Flare,
    Radio,
    SpoiledFood,
    StarStorm,
    GasFood,
    Newcomers,
    Landfall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StepId(pub usize);

impl StepId {
    pub const ENTRY: StepId = StepId(0);
}

/// Where a choice leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Goto(StepId),
    /// Leave the event and resume normal play.
    Resume,
    /// Leave the event and start a new game.
    Restart,
}

#[derive(Debug, Clone, Copy)]
pub struct Choice {
    pub label: &'static str,
    pub next: Transition,
}

#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub text: &'static str,
    /// Applied when the step is entered.
    pub effects: &'static [(ResourceKind, i64)],
    /// Forced steps apply their effects regardless of what the colony can pay.
    pub forced: bool,
    pub choices: &'static [Choice],
}

#[derive(Debug, Clone, Copy)]
pub struct EventDefinition {
    pub kind: EventKind,
    pub title: &'static str,
    pub steps: &'static [Step],
}

impl EventDefinition {
    pub fn step(&self, id: StepId) -> Option<&'static Step> {
        self.steps.get(id.0)
    }
}

const CONTINUE: &[Choice] = &[Choice {
    label: "Continue",
    next: Transition::Resume,
}];

const fn goto(label: &'static str, step: usize) -> Choice {
    Choice {
        label,
        next: Transition::Goto(StepId(step)),
    }
}

const fn outcome(
    text: &'static str,
    effects: &'static [(ResourceKind, i64)],
    forced: bool,
) -> Step {
    Step {
        text,
        effects,
        forced,
        choices: CONTINUE,
    }
}

const START: EventDefinition = EventDefinition {
    kind: EventKind::Start,
    title: "Crash landing",
    steps: &[Step {
        text: "Your colony ship has crash-landed on a barren asteroid. The evacuation fleet \
               will arrive in ten days. Build biodomes, keep the oxygen tanks filled and \
               keep your people alive until then.",
        effects: &[],
        forced: true,
        choices: &[Choice {
            label: "Begin",
            next: Transition::Resume,
        }],
    }],
};

const WIN: EventDefinition = EventDefinition {
    kind: EventKind::Win,
    title: "Evacuation",
    steps: &[Step {
        text: "The evacuation fleet has arrived!\n\
               You held out for {days} days and {people} colonists board the ships.\n\
               Minerals mined: {minerals}\nGas refined: {gas}\nScience gathered: {science}",
        effects: &[],
        forced: true,
        choices: &[Choice {
            label: "Play again",
            next: Transition::Restart,
        }],
    }],
};

const LOSE: EventDefinition = EventDefinition {
    kind: EventKind::Lose,
    title: "Silence",
    steps: &[Step {
        text: "The last colonist has perished. The evacuation fleet will find an empty colony.\n\
               The colony lasted {days} days with {people} survivors.\n\
               Minerals mined: {minerals}\nGas refined: {gas}\nScience gathered: {science}",
        effects: &[],
        forced: true,
        choices: &[Choice {
            label: "Try again",
            next: Transition::Restart,
        }],
    }],
};

const MAGNETIC: EventDefinition = EventDefinition {
    kind: EventKind::Magnetic,
    title: "Magnetic storm",
    steps: &[
        Step {
            text: "A magnetic storm sweeps across the asteroid. Instruments go haywire and \
                   the research archive is at risk.",
            effects: &[],
            forced: true,
            choices: &[
                goto("Shield the archive (20 minerals)", 1),
                goto("Ride it out", 2),
            ],
        },
        outcome(
            "The shielding holds. The storm passes without harm.",
            &[(ResourceKind::Minerals, -20)],
            false,
        ),
        outcome(
            "The storm wipes part of the research archive.",
            &[(ResourceKind::Science, -30)],
            true,
        ),
    ],
};

const TOXIC: EventDefinition = EventDefinition {
    kind: EventKind::Toxic,
    title: "Toxic leak",
    steps: &[
        Step {
            text: "A crack in the habitat floor is venting toxic fumes.",
            effects: &[],
            forced: true,
            choices: &[
                goto("Seal the crack (30 minerals)", 1),
                goto("Evacuate the section", 2),
            ],
        },
        outcome(
            "The crack is sealed before anyone is hurt.",
            &[(ResourceKind::Minerals, -30)],
            false,
        ),
        outcome(
            "Three colonists were too slow to get out, and the section has to be vented.",
            &[(ResourceKind::People, -3), (ResourceKind::Oxygen, -50)],
            true,
        ),
    ],
};

const FLARE: EventDefinition = EventDefinition {
    kind: EventKind::Flare,
    title: "Solar flare",
    steps: &[
        Step {
            text: "Sensors warn of an incoming solar flare.",
            effects: &[],
            forced: true,
            choices: &[
                goto("Vent gas into a plasma screen (25 gas)", 1),
                goto("Hide in the biodomes", 2),
            ],
        },
        outcome(
            "The plasma screen deflects the worst of the flare.",
            &[(ResourceKind::Gas, -25)],
            false,
        ),
        outcome(
            "Everyone survives, but the flare scorches the crops.",
            &[(ResourceKind::Food, -20)],
            true,
        ),
    ],
};

const RADIO: EventDefinition = EventDefinition {
    kind: EventKind::Radio,
    title: "Radio signal",
    steps: &[
        Step {
            text: "The antenna picks up a faint, repeating radio signal.",
            effects: &[],
            forced: true,
            choices: &[
                goto("Decode it (20 science)", 1),
                Choice {
                    label: "Ignore it",
                    next: Transition::Resume,
                },
            ],
        },
        Step {
            text: "It is a distress beacon from an abandoned mining drone nearby.",
            effects: &[(ResourceKind::Science, -20)],
            forced: false,
            choices: &[
                goto("Send a team to salvage it", 2),
                Choice {
                    label: "Leave it",
                    next: Transition::Resume,
                },
            ],
        },
        outcome(
            "The team returns with the drone's cargo hold.",
            &[(ResourceKind::Minerals, 60), (ResourceKind::Gas, 20)],
            true,
        ),
    ],
};

const SPOILED_FOOD: EventDefinition = EventDefinition {
    kind: EventKind::SpoiledFood,
    title: "Spoiled food",
    steps: &[
        Step {
            text: "Mould has been found in the food stores.",
            effects: &[],
            forced: true,
            choices: &[
                goto("Burn the spoiled crates", 1),
                goto("Fumigate the stores (15 gas)", 2),
            ],
        },
        outcome(
            "A quarter of the stores go up in smoke.",
            &[(ResourceKind::Food, -25)],
            true,
        ),
        outcome(
            "Fumigation saves most of the food.",
            &[(ResourceKind::Gas, -15), (ResourceKind::Food, -5)],
            false,
        ),
    ],
};

const STAR_STORM: EventDefinition = EventDefinition {
    kind: EventKind::StarStorm,
    title: "Meteor shower",
    steps: &[
        Step {
            text: "A meteor shower is heading straight for the colony.",
            effects: &[],
            forced: true,
            choices: &[
                goto("Reinforce the domes (40 minerals)", 1),
                goto("Take cover", 2),
            ],
        },
        outcome(
            "The reinforced domes shrug off the impacts.",
            &[(ResourceKind::Minerals, -40)],
            false,
        ),
        outcome(
            "Meteors smash into the surface, taking two colonists and part of the colony with them.",
            &[(ResourceKind::TileCount, -2), (ResourceKind::People, -2)],
            true,
        ),
    ],
};

const GAS_FOOD: EventDefinition = EventDefinition {
    kind: EventKind::GasFood,
    title: "Nutrient synthesis",
    steps: &[
        Step {
            text: "The biologists propose converting refined gas into nutrient paste.",
            effects: &[],
            forced: true,
            choices: &[
                goto("Convert 30 gas", 1),
                Choice {
                    label: "Decline",
                    next: Transition::Resume,
                },
            ],
        },
        outcome(
            "The paste is bland but filling.",
            &[(ResourceKind::Gas, -30), (ResourceKind::Food, 40)],
            false,
        ),
    ],
};

const NEWCOMERS: EventDefinition = EventDefinition {
    kind: EventKind::Newcomers,
    title: "Newcomers",
    steps: &[
        Step {
            text: "A lifeboat from another wreck docks at the colony, carrying survivors.",
            effects: &[],
            forced: true,
            choices: &[goto("Take them in", 1), goto("Turn them away", 2)],
        },
        outcome(
            "Eight survivors join the colony.",
            &[(ResourceKind::People, 8)],
            true,
        ),
        outcome(
            "Before leaving, they share their star charts.",
            &[(ResourceKind::Science, 10)],
            true,
        ),
    ],
};

const LANDFALL: EventDefinition = EventDefinition {
    kind: EventKind::Landfall,
    title: "Landfall",
    steps: &[
        Step {
            text: "The ground trembles. A section of the asteroid crust is giving way.",
            effects: &[],
            forced: true,
            choices: &[
                goto("Brace the foundations (30 minerals)", 1),
                goto("Send scouts to look", 2),
            ],
        },
        outcome(
            "The foundations are braced and the crust settles.",
            &[(ResourceKind::Minerals, -30)],
            false,
        ),
        Step {
            text: "The scouts find a fresh cavern exposed by the quake.",
            effects: &[(ResourceKind::Science, 15)],
            forced: true,
            choices: &[goto("Mine the cavern", 3), goto("Pull back", 4)],
        },
        outcome(
            "The cavern is rich, but a cave-in claims two miners.",
            &[(ResourceKind::People, -2), (ResourceKind::Minerals, 80)],
            true,
        ),
        outcome(
            "The crust collapses behind the retreating scouts.",
            &[(ResourceKind::TileCount, -1)],
            true,
        ),
    ],
};

impl EventKind {
    /// Hazards that can strike at random during normal play.
    pub const HAZARDS: [EventKind; 9] = [
        EventKind::Magnetic,
        EventKind::Toxic,
        EventKind::Flare,
        EventKind::Radio,
        EventKind::SpoiledFood,
        EventKind::StarStorm,
        EventKind::GasFood,
        EventKind::Newcomers,
        EventKind::Landfall,
    ];

    pub fn definition(self) -> &'static EventDefinition {
        match self {
            EventKind::Start => &START,
            EventKind::Win => &WIN,
            EventKind::Lose => &LOSE,
            EventKind::Magnetic => &MAGNETIC,
            EventKind::Toxic => &TOXIC,
            EventKind::Flare => &FLARE,
            EventKind::Radio => &RADIO,
            EventKind::SpoiledFood => &SPOILED_FOOD,
            EventKind::StarStorm => &STAR_STORM,
            EventKind::GasFood => &GAS_FOOD,
            EventKind::Newcomers => &NEWCOMERS,
            EventKind::Landfall => &LANDFALL,
        }
    }

    /// Win and Lose end the game and report the colony's totals.
    pub fn is_terminal(self) -> bool {
        matches!(self, EventKind::Win | EventKind::Lose)
    }
}
