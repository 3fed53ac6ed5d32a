//! The oracle's fixed response material and selection rules.

use rand::Rng;

/// The one question with a fixed, non-random answer.
pub const ULTIMATE_QUESTION: &str = "What is the answer to life, the universe and everything?";

/// The oracle's reply to [`ULTIMATE_QUESTION`].
pub const ULTIMATE_ANSWER: &str = "This one's obvious. 42, dummy.";

/// Reply to input that contains no words at all.
pub const WORDLESS_REPLY: &str = "You must ask a question.";

/// The trigger phrase for nonsense, also muttered by the idle muse.
pub const NONSENSE_TRIGGER: &str = "mosh mosh";

/// Pointless nonsense, served for [`NONSENSE_TRIGGER`] after extra delay.
pub const NONSENSE: &[&str] = &[
    "Face is the place.",
    "Mace to the face.",
    "Face is a flat circle.",
    "Flat circle is life.",
    "Time is a flat circle.",
    "Life is a fart.",
    "Life is a face.",
    "Life is a flat circle.",
    "Life is a flat fart.",
    "Life is a flat face.",
    "Life is a flat moon.",
    "Better to be a fart than a face.",
    "Better to be a face than a fart.",
];

/// Legit wise responses to questions.
pub const ANSWERS: &[&str] = &[
    "Yes.",
    "No.",
    "Maybe.",
    "Probably.",
    "Probably not.",
    "Perhaps.",
    "Perhaps not.",
    "Perhaps you should ask again later.",
    "I don't know.",
    "I don't care.",
    "I don't understand.",
    "I don't think so.",
    "I don't think you should ask that.",
    "I should not answer that.",
    "I should think so",
    "Perhaps you should ask someone else.",
    "Perhaps you should ask yourself.",
    "Perhaps you should ask your mother.",
    "Perhaps you should ask your therapist.",
    "Perhaps you should ask your doctor.",
    "Perhaps you should ask your lawyer.",
    "Perhaps you should ask your priest.",
    "Perhaps you should ask your witch doctor.",
    "Perhaps you should ask a shaman.",
    "Perhaps you should ask a wizard.",
];

/// A chosen reply, plus whether delivering it takes the extra nonsense delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    /// The reply text.
    pub text: &'static str,
    /// Whether the respond task pauses again before sending this reply.
    pub takes_longer: bool,
}

/// Chooses a reply for the given question.
///
/// Rule precedence: wordless input gets [`WORDLESS_REPLY`]; input containing
/// [`NONSENSE_TRIGGER`] draws from [`NONSENSE`] and takes the extra delay;
/// input containing [`ULTIMATE_QUESTION`] gets the fixed
/// [`ULTIMATE_ANSWER`]; everything else draws from [`ANSWERS`].
pub fn divine<R: Rng>(question: &str, rng: &mut R) -> Reply {
    if question.split_whitespace().next().is_none() {
        return Reply {
            text: WORDLESS_REPLY,
            takes_longer: false,
        };
    }

    if question.contains(NONSENSE_TRIGGER) {
        return Reply {
            text: NONSENSE[rng.gen_range(0..NONSENSE.len())],
            takes_longer: true,
        };
    }

    if question.contains(ULTIMATE_QUESTION) {
        return Reply {
            text: ULTIMATE_ANSWER,
            takes_longer: false,
        };
    }

    Reply {
        text: ANSWERS[rng.gen_range(0..ANSWERS.len())],
        takes_longer: false,
    }
}
