//! CLI entry point.
//!
//! # Responsibility
//! - Verify `taskboard_core` linkage.
//! - Print the rendered board for a task database given as the first argument.

use std::process::ExitCode;
use taskboard_core::db::open_db;
use taskboard_core::{BoardBody, BoardItem, SqliteTaskRepository, TaskBoard};

fn main() -> ExitCode {
    println!("taskboard_core ping={}", taskboard_core::ping());
    println!("taskboard_core version={}", taskboard_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match print_board(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("taskboard: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_board(db_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(db_path)?;
    let repo = SqliteTaskRepository::try_new(&conn)?;
    let mut board = TaskBoard::new(repo);
    board.start()?;

    let view = board.render();
    println!("== {} ==", view.title);
    if let Some(warning) = &view.limit_warning {
        println!("! {warning}");
    }

    match &view.body {
        BoardBody::Empty { message } => println!("{message}"),
        BoardBody::Items { items } => {
            for item in items {
                match item {
                    BoardItem::Suggestion(card) => {
                        println!("[AI] {} (due {})", card.title, card.deadline_label);
                    }
                    BoardItem::Editor(editor) => {
                        println!("[editing] {} (due {})", editor.title, editor.deadline);
                    }
                    BoardItem::Task(card) => {
                        let status = if card.completed {
                            "done"
                        } else if card.overdue {
                            "overdue"
                        } else {
                            "open"
                        };
                        println!(
                            "[{}] {} (due {}, {status})",
                            card.priority_label, card.title, card.deadline_label
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
