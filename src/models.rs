use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Cycles `None -> Easy -> Medium -> Hard -> None`, used by every
    /// "any difficulty" selector.
    pub fn cycle(current: Option<Difficulty>) -> Option<Difficulty> {
        match current {
            None => Some(Difficulty::Easy),
            Some(Difficulty::Easy) => Some(Difficulty::Medium),
            Some(Difficulty::Medium) => Some(Difficulty::Hard),
            Some(Difficulty::Hard) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; 4] = [
        OptionLetter::A,
        OptionLetter::B,
        OptionLetter::C,
        OptionLetter::D,
    ];

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(OptionLetter::A),
            'B' => Some(OptionLetter::B),
            'C' => Some(OptionLetter::C),
            'D' => Some(OptionLetter::D),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            OptionLetter::A => 'A',
            OptionLetter::B => 'B',
            OptionLetter::C => 'C',
            OptionLetter::D => 'D',
        }
    }

    pub fn index(&self) -> usize {
        match self {
            OptionLetter::A => 0,
            OptionLetter::B => 1,
            OptionLetter::C => 2,
            OptionLetter::D => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    /// Exam payloads may leave the answer key out.
    #[serde(default)]
    pub correct_option: Option<OptionLetter>,
    pub difficulty: Difficulty,
    pub subject_id: i64,
    pub subject_name: String,
    #[serde(default)]
    pub is_new: bool,
}

impl Question {
    pub fn option_text(&self, letter: OptionLetter) -> &str {
        match letter {
            OptionLetter::A => &self.option_a,
            OptionLetter::B => &self.option_b,
            OptionLetter::C => &self.option_c,
            OptionLetter::D => &self.option_d,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamStatus {
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamSummary {
    pub id: i64,
    pub name: String,
    pub total_questions: u32,
    pub answered_questions: u32,
    #[serde(default)]
    pub score: f64,
}

impl ExamSummary {
    pub fn status(&self) -> ExamStatus {
        if self.answered_questions == 0 {
            ExamStatus::NotStarted
        } else if self.answered_questions < self.total_questions {
            ExamStatus::InProgress
        } else {
            ExamStatus::Completed
        }
    }

    /// Answered fraction in `[0, 1]`; an exam without questions reports 0.
    pub fn progress_ratio(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        (self.answered_questions as f64 / self.total_questions as f64).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamDetail {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_option: OptionLetter,
    pub difficulty: Difficulty,
    pub subject_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateExamRequest {
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    pub only_new: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExamRequest {
    pub name: String,
    pub question_ids: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    pub question_id: i64,
    pub user_answer: OptionLetter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceEntry {
    pub subject_id: i64,
    pub subject_name: String,
    pub correct_answers: u32,
    pub total_answers: u32,
    #[serde(default)]
    pub accuracy: f64,
}

impl PerformanceEntry {
    pub fn incorrect_answers(&self) -> u32 {
        self.total_answers.saturating_sub(self.correct_answers)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverallPerformance {
    pub total_correct: u32,
    pub total_answers: u32,
    pub overall_accuracy: f64,
    pub subjects_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub total_questions: usize,
    pub total_exams: usize,
    pub total_subjects: usize,
    pub overall_accuracy: f64,
}
