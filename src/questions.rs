//! Question catalog — general prompts and the per-major question sets.

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// The camp tracks an applicant can register for.
///
/// Resolved once per session from the navigation path and fixed from the
/// moment the major-questions step is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Major {
    Content,
    Design,
    Marketing,
    Programming,
}

impl Major {
    pub const ALL: [Major; 4] = [
        Major::Content,
        Major::Design,
        Major::Marketing,
        Major::Programming,
    ];
}

impl std::str::FromStr for Major {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "content" => Ok(Self::Content),
            "design" => Ok(Self::Design),
            "marketing" => Ok(Self::Marketing),
            "programming" => Ok(Self::Programming),
            other => Err(LookupError::UnknownMajor {
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Major {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Content => "content",
            Self::Design => "design",
            Self::Marketing => "marketing",
            Self::Programming => "programming",
        };
        write!(f, "{s}")
    }
}

/// How the third major question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    FreeText,
    FileUpload,
}

/// The three questions asked for one major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MajorQuestions {
    pub q1: &'static str,
    pub q2: &'static str,
    pub q3: &'static str,
    pub q3_kind: QuestionKind,
}

/// The general questions every applicant answers, regardless of major.
pub mod general {
    pub const Q1: &str = "Why do you want to join the camp?";
    pub const Q2: &str = "What do you expect to get out of the week, and what will you bring to your team?";
    pub const Q3: &str = "Tell us about a project or activity you are proud of, and your part in it.";
}

/// Field names the general answers are stored under.
pub const GENERAL_ANSWER_FIELDS: [&str; 3] = ["generalAnswer1", "generalAnswer2", "generalAnswer3"];

/// Field names the major answers are stored under.
pub const MAJOR_ANSWER_FIELDS: [&str; 3] = ["majorAnswer1", "majorAnswer2", "majorAnswer3"];

/// Look up the question set for a major.
///
/// Exhaustive over [`Major`], so adding a track without questions is a
/// compile error. Only the design major collects its third answer as a
/// file upload; the programming track asks a developer-oriented Q3.
pub fn questions_for(major: Major) -> MajorQuestions {
    match major {
        Major::Content => MajorQuestions {
            q1: "Pick a topic you care about and pitch it as a story for the camp blog.",
            q2: "Which piece of content (article, video, podcast) changed your mind about something? Why?",
            q3: "Write a short piece (10-15 lines) introducing your school to someone who has never been there.",
            q3_kind: QuestionKind::FreeText,
        },
        Major::Design => MajorQuestions {
            q1: "What makes a design good, in your own words?",
            q2: "Describe a thing you use every day whose design annoys you, and how you would fix it.",
            q3: "Upload a portfolio with up to three works you made yourself (PDF, max 10 pages).",
            q3_kind: QuestionKind::FileUpload,
        },
        Major::Marketing => MajorQuestions {
            q1: "Pick a product you love and write a one-line message that would make a friend try it.",
            q2: "Tell us about a campaign or advertisement you think failed, and why.",
            q3: "How would you promote this camp to students at your school with a budget of zero?",
            q3_kind: QuestionKind::FreeText,
        },
        Major::Programming => MajorQuestions {
            q1: "Tell us about something you have built — a website, a bot, a game, a script. What did you learn?",
            q2: "When your program does not work and you have no idea why, what do you do, step by step?",
            q3: "You are given a list of a million numbers and asked for the ten largest. Explain how you would do it and why your way is fast enough.",
            q3_kind: QuestionKind::FreeText,
        },
    }
}
