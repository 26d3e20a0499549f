use crate::models::{Difficulty, Question};

/// Three independent predicates combined with AND. An empty search string or a
/// `None` selector is inactive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionFilter {
    pub search: String,
    pub subject_id: Option<i64>,
    pub difficulty: Option<Difficulty>,
}

impl QuestionFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.subject_id.is_none() && self.difficulty.is_none()
    }

    pub fn matches(&self, question: &Question) -> bool {
        if !self.search.is_empty()
            && !question
                .text
                .to_lowercase()
                .contains(&self.search.to_lowercase())
        {
            return false;
        }
        if let Some(subject_id) = self.subject_id
            && question.subject_id != subject_id
        {
            return false;
        }
        if let Some(difficulty) = self.difficulty
            && question.difficulty != difficulty
        {
            return false;
        }
        true
    }

    /// Keeps the server's order.
    pub fn apply(&self, questions: &[Question]) -> Vec<Question> {
        questions
            .iter()
            .filter(|q| self.matches(q))
            .cloned()
            .collect()
    }

    pub fn clear(&mut self) {
        *self = QuestionFilter::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::sample_question;

    fn bank() -> Vec<Question> {
        vec![
            sample_question(1, "What is the Capital of France?", 1, Difficulty::Easy),
            sample_question(2, "Capital gains tax rate?", 2, Difficulty::Hard),
            sample_question(3, "Derivative of x^2?", 1, Difficulty::Medium),
            sample_question(4, "Integral of 1/x?", 1, Difficulty::Hard),
        ]
    }

    fn ids(questions: &[Question]) -> Vec<i64> {
        questions.iter().map(|q| q.id).collect()
    }

    #[test]
    fn test_default_filter_is_identity() {
        let filter = QuestionFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&bank()), bank());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let filter = QuestionFilter {
            search: "cAPITAL".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&bank())), vec![1, 2]);
    }

    #[test]
    fn test_subject_and_difficulty_are_exact() {
        let filter = QuestionFilter {
            subject_id: Some(1),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&bank())), vec![1, 3, 4]);

        let filter = QuestionFilter {
            difficulty: Some(Difficulty::Hard),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&bank())), vec![2, 4]);
    }

    #[test]
    fn test_predicates_compose_with_and() {
        let filter = QuestionFilter {
            search: "of".to_string(),
            subject_id: Some(1),
            difficulty: Some(Difficulty::Hard),
        };
        assert_eq!(ids(&filter.apply(&bank())), vec![4]);

        // Every kept element matches and every dropped one does not.
        let all = bank();
        let kept = filter.apply(&all);
        for question in &all {
            assert_eq!(kept.contains(question), filter.matches(question));
        }
    }

    #[test]
    fn test_no_match_yields_empty() {
        let filter = QuestionFilter {
            search: "photosynthesis".to_string(),
            ..Default::default()
        };
        assert!(filter.apply(&bank()).is_empty());
    }

    #[test]
    fn test_clear_resets_every_predicate() {
        let mut filter = QuestionFilter {
            search: "x".to_string(),
            subject_id: Some(3),
            difficulty: Some(Difficulty::Easy),
        };
        filter.clear();
        assert!(filter.is_empty());
    }
}
