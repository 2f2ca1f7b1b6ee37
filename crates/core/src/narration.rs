//! Fixed narration lines for quiz prompts and answers.

use crate::grammar::counted_noun;
use crate::model::{AnswerOption, Count, Task, TaskKind};

pub const NUMBER_RETRY: &str = "Versuch es nochmal!";
pub const OBJECT_RETRY: &str = "Nicht ganz. Schau genau hin!";

/// Spoken prompt for a freshly generated task.
#[must_use]
pub fn task_prompt(task: &Task) -> String {
    match (task.kind(), task.target_kind()) {
        (TaskKind::ObjectCount, Some(kind)) => {
            format!("Finde {}", counted_noun(task.target(), kind))
        }
        _ => format!("Finde die {}", task.target().word()),
    }
}

/// On-screen question for a task.
#[must_use]
pub fn task_caption(task: &Task) -> String {
    match (task.kind(), task.target_kind()) {
        (TaskKind::ObjectCount, Some(kind)) => {
            format!("Finde {}", counted_noun(task.target(), kind))
        }
        _ => format!("Welche Zahl ist {}?", task.target().word()),
    }
}

#[must_use]
pub fn number_affirmation(count: Count) -> String {
    format!("Richtig! {}", count.word())
}

#[must_use]
pub fn object_affirmation(option: &AnswerOption) -> String {
    format!("Richtig! {}", counted_noun(option.count, option.kind))
}

/// Accessible label for an option tile.
#[must_use]
pub fn option_label(option: &AnswerOption) -> String {
    counted_noun(option.count, option.kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectKind;

    fn count(value: u8) -> Count {
        Count::new(value).unwrap()
    }

    #[test]
    fn number_task_lines() {
        let task = Task::number(count(3));
        assert_eq!(task_prompt(&task), "Finde die Drei");
        assert_eq!(task_caption(&task), "Welche Zahl ist Drei?");
        assert_eq!(number_affirmation(count(3)), "Richtig! Drei");
    }

    #[test]
    fn object_task_lines_use_numeral() {
        let options = [
            AnswerOption::new(count(1), ObjectKind::Flower, true),
            AnswerOption::new(count(1), ObjectKind::Dot, false),
            AnswerOption::new(count(6), ObjectKind::Flower, false),
            AnswerOption::new(count(6), ObjectKind::Dot, false),
        ];
        let task = Task::object_count(count(1), ObjectKind::Flower, options).unwrap();
        assert_eq!(task_prompt(&task), "Finde 1 Blume");
        assert_eq!(object_affirmation(&options[3]), "Richtig! 6 Punkte");
        assert_eq!(option_label(&options[0]), "1 Blume");
    }
}
