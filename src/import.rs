use thiserror::Error;

use crate::model::{CardContent, Difficulty};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("Nothing to import. Write one card per line as question; answer.")]
    Empty,

    #[error("Lines {} need a question and an answer separated by a tab, ';' or '|'.", join_lines(.0))]
    Malformed(Vec<usize>),
}

fn join_lines(lines: &[usize]) -> String {
    lines
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn split_line(line: &str) -> Option<(&str, &str)> {
    let at = line.find(&['\t', ';', '|'][..])?;
    let (question, rest) = line.split_at(at);
    let answer = &rest[1..];
    let (question, answer) = (question.trim(), answer.trim());
    if question.is_empty() || answer.is_empty() {
        None
    } else {
        Some((question, answer))
    }
}

/// Parse pasted text into cards, one per non-blank line.
pub fn parse_import(text: &str, difficulty: Difficulty) -> Result<Vec<CardContent>, ImportError> {
    let mut cards = Vec::new();
    let mut bad_lines = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match split_line(line) {
            Some((question, answer)) => cards.push(CardContent {
                question: question.to_string(),
                answer: answer.to_string(),
                difficulty,
            }),
            None => bad_lines.push(index + 1),
        }
    }

    if !bad_lines.is_empty() {
        return Err(ImportError::Malformed(bad_lines));
    }
    if cards.is_empty() {
        return Err(ImportError::Empty);
    }
    Ok(cards)
}
