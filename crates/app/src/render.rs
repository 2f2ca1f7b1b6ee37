//! Draws session snapshots as text lines.

use tokio::sync::watch;

use count_core::model::{Feedback, TaskKind};
use count_core::narration::{option_label, task_caption};
use services::{Mode, SessionSnapshot};

const TILE_KEYS: [char; 4] = ['a', 'b', 'c', 'd'];

/// Print a board line for every snapshot until the controller goes away.
pub async fn run(mut snapshots: watch::Receiver<SessionSnapshot>) {
    let mut last = String::new();
    while snapshots.changed().await.is_ok() {
        let board = board(&snapshots.borrow_and_update());
        if board != last {
            println!("{board}");
            last = board;
        }
    }
}

#[must_use]
pub fn board(snapshot: &SessionSnapshot) -> String {
    match (snapshot.mode, &snapshot.task) {
        (Mode::Quiz, Some(task)) => {
            let mut out = format!("❓ {}", task_caption(task));
            if task.kind() == TaskKind::ObjectCount {
                for (key, option) in TILE_KEYS.iter().zip(task.options()) {
                    let icons = option.kind.glyph().repeat(usize::from(option.count.value()));
                    out.push_str(&format!("\n   {key}) {icons}  ({})", option_label(option)));
                }
            }
            match snapshot.feedback {
                Feedback::Correct => out.push_str("\n   ✅"),
                Feedback::Incorrect => out.push_str("\n   ❌"),
                Feedback::None => {}
            }
            out
        }
        (Mode::Quiz, None) => "❓ …".to_string(),
        (Mode::Free, _) => {
            let digit = snapshot
                .selected
                .map_or_else(|| "-".to_string(), |count| count.to_string());
            let icons = snapshot
                .active_kind
                .glyph()
                .repeat(usize::from(snapshot.displayed_count));
            format!("[{}] {digit}: {icons}", snapshot.active_kind)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use count_core::model::{AnswerOption, Count, ObjectKind, Task};
    use services::{FreePhase, SessionToken};

    fn snapshot(mode: Mode, task: Option<Task>) -> SessionSnapshot {
        SessionSnapshot {
            mode,
            phase: FreePhase::Animating,
            session: SessionToken::default(),
            selected: Some(Count::new(3).unwrap()),
            displayed_count: 2,
            target: Count::new(3).unwrap(),
            active_kind: ObjectKind::Apple,
            busy: true,
            task,
            feedback: Feedback::None,
        }
    }

    #[test]
    fn free_board_shows_revealed_icons() {
        assert_eq!(board(&snapshot(Mode::Free, None)), "[Apfel] 3: 🍎🍎");
    }

    #[test]
    fn quiz_board_lists_tiles() {
        let two = Count::new(2).unwrap();
        let five = Count::new(5).unwrap();
        let task = Task::object_count(
            two,
            ObjectKind::Dot,
            [
                AnswerOption::new(two, ObjectKind::Dot, true),
                AnswerOption::new(five, ObjectKind::Dot, false),
                AnswerOption::new(two, ObjectKind::House, false),
                AnswerOption::new(five, ObjectKind::House, false),
            ],
        )
        .unwrap();

        let mut quiz = snapshot(Mode::Quiz, Some(task));
        quiz.feedback = Feedback::Incorrect;
        let text = board(&quiz);

        assert!(text.starts_with("❓ Finde 2 Punkte"));
        assert!(text.contains("a) 🟢🟢  (2 Punkte)"));
        assert!(text.contains("c) 🏠🏠  (2 Häuser)"));
        assert!(text.ends_with("❌"));
    }

    #[test]
    fn number_task_caption() {
        let task = Task::number(Count::new(8).unwrap());
        assert_eq!(board(&snapshot(Mode::Quiz, Some(task))), "❓ Welche Zahl ist Acht?");
    }
}
