// SPDX-License-Identifier: Apache-2.0

//! Answer options offered by the intake questionnaires.
//!
//! Values are the stable wire identifiers stored with each lead; labels are
//! what the prospect saw when answering.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerOption {
    pub value: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub description: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> AnswerOption {
    AnswerOption {
        value,
        label,
        description: "",
    }
}

const fn described(
    value: &'static str,
    label: &'static str,
    description: &'static str,
) -> AnswerOption {
    AnswerOption {
        value,
        label,
        description,
    }
}

pub const ISSUE_SOMETHING_ELSE: &str = "something-else";
pub const IMPACT_THOUGHT_ABOUT_REHOMING: &str = "thought-about-rehoming";

pub const ISSUE_OPTIONS: [AnswerOption; 6] = [
    described(
        "puppy-out-of-control",
        "My puppy is out of control",
        "Biting, jumping, not listening",
    ),
    opt("pulls-lunges-reacts", "My dog pulls, lunges, or reacts on walks"),
    opt(
        "anxiety-fear-separation",
        "My dog has anxiety, fear, or separation issues",
    ),
    opt(
        "aggression-safety",
        "My dog has shown aggression or I have safety concerns",
    ),
    opt(
        "better-obedience",
        "My dog is generally good but I want better obedience and off-leash reliability",
    ),
    opt(ISSUE_SOMETHING_ELSE, "Something else"),
];

pub const DURATION_OPTIONS: [AnswerOption; 5] = [
    described("less-than-month", "Less than a month", "It's new"),
    opt("1-6-months", "1–6 months"),
    opt("6-12-months", "6–12 months"),
    opt("over-a-year", "Over a year"),
    opt("since-got-dog", "Since I got the dog"),
];

pub const TRIED_OPTIONS: [AnswerOption; 5] = [
    opt("youtube-articles", "Watched videos or read articles online"),
    opt("different-trainer", "Tried a different trainer"),
    opt("tools-equipment", "Bought tools or equipment"),
    opt("talked-to-vet", "Talked to my vet"),
    opt("nothing-yet", "Haven't tried anything yet"),
];

pub const IMPACT_OPTIONS: [AnswerOption; 6] = [
    opt("dread-walking", "I dread walking my dog"),
    opt("avoid-areas", "I avoid certain dogs, people, or places"),
    opt("cant-leave-alone", "My dog can't be left alone"),
    opt("worried-about-safety", "I'm worried about someone getting hurt"),
    opt("overwhelmed", "I'm feeling overwhelmed or exhausted"),
    opt(IMPACT_THOUGHT_ABOUT_REHOMING, "I've thought about rehoming my dog"),
];

pub const DOG_AGE_OPTIONS: [AnswerOption; 5] = [
    opt("under-6-months", "Under 6 months"),
    opt("6-12-months", "6–12 months"),
    opt("1-2-years", "1–2 years"),
    opt("2-5-years", "2–5 years"),
    opt("5-plus-years", "5+ years"),
];

pub const DOG_DURATION_OPTIONS: [AnswerOption; 4] = [
    opt("less-than-3-months", "Less than 3 months"),
    opt("3-12-months", "3–12 months"),
    opt("1-3-years", "1–3 years"),
    opt("3-plus-years", "3+ years"),
];

pub const DOG_SOURCE_OPTIONS: [AnswerOption; 4] = [
    opt("breeder", "Breeder"),
    opt("rescue-shelter", "Rescue or shelter"),
    opt("rehomed", "Rehomed from another owner"),
    opt("other", "Other"),
];

pub const GOALS_OPTIONS: [AnswerOption; 5] = [
    opt("calm-walks", "Calm, enjoyable walks"),
    opt("around-dogs", "My dog can be around others without reacting"),
    opt("left-alone", "My dog can be left alone safely"),
    opt("off-leash", "Off-leash reliability"),
    opt("feel-confident", "I want to feel confident handling my dog"),
];

pub const BEST_TIME_OPTIONS: [AnswerOption; 4] = [
    opt("morning", "Morning"),
    opt("afternoon", "Afternoon"),
    opt("evening", "Evening"),
    opt("no-preference", "No preference"),
];

pub const CONNECT_OPTIONS: [AnswerOption; 2] = [
    described(
        "discovery-call",
        "Free 15-minute discovery call",
        "A quick phone call to talk through what's going on and figure out the right path. No cost, no commitment.",
    ),
    described(
        "in-person-evaluation",
        "In-person evaluation ($100)",
        "We meet you and your dog in the real world and do a full behavioral assessment. 60–75 minutes.",
    ),
];

/// Program signup problems are stored by label, not by slug.
pub const PROGRAM_PROBLEMS: [&str; 8] = [
    "Leash pulling",
    "Reactivity to dogs or people",
    "Jumping on guests",
    "Poor recall",
    "Barking/excitability",
    "Separation anxiety",
    "Aggression/safety concerns",
    "General obedience",
];

pub const DAYS_OF_WEEK: [&str; 6] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub const TIME_SLOTS: [&str; 5] = [
    "8:00 AM - 10:00 AM",
    "10:00 AM - 12:00 PM",
    "1:00 PM - 3:00 PM",
    "3:00 PM - 5:00 PM",
    "5:00 PM - 7:00 PM",
];

#[must_use]
pub fn is_known(options: &[AnswerOption], value: &str) -> bool {
    options.iter().any(|o| o.value == value)
}

#[must_use]
pub fn label_for(options: &[AnswerOption], value: &str) -> Option<&'static str> {
    options.iter().find(|o| o.value == value).map(|o| o.label)
}
