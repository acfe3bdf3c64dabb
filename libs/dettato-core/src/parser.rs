//! Markdown parser for deck files.
//!
//! # Format
//! ```markdown
//! Q: Good morning!
//! A: Buongiorno!
//!
//! Q: The city is beautiful.
//! A: La città è bella.
//! ```
//!
//! Every `Q:` line starts a new card. Values may continue over several
//! lines. Text before the first `Q:` is ignored, so a deck may open with a
//! heading.

use crate::error::{DeckError, Result};
use crate::types::CardRecord;

/// Parse markdown content into card records, in file order.
pub fn parse(content: &str) -> Result<Vec<CardRecord>> {
    let mut parser = Parser::new();

    for (idx, line) in content.lines().enumerate() {
        parser.process_line(line, idx + 1)?;
    }

    parser.finish()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Question,
    Answer,
}

struct CardBuilder {
    question: Option<String>,
    answer: Option<String>,
    start_line: usize,
}

impl CardBuilder {
    fn new(start_line: usize) -> Self {
        Self {
            question: None,
            answer: None,
            start_line,
        }
    }

    fn build(self) -> Result<CardRecord> {
        let question = self
            .question
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .ok_or(DeckError::MissingQuestion {
                line: self.start_line,
            })?;
        let answer = self
            .answer
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .ok_or(DeckError::MissingAnswer {
                line: self.start_line,
            })?;

        Ok(CardRecord { question, answer })
    }
}

struct Parser {
    cards: Vec<CardRecord>,
    current: Option<CardBuilder>,
    current_field: Option<Field>,
    buffer: Vec<String>,
}

impl Parser {
    fn new() -> Self {
        Self {
            cards: Vec::new(),
            current: None,
            current_field: None,
            buffer: Vec::new(),
        }
    }

    fn process_line(&mut self, line: &str, line_num: usize) -> Result<()> {
        match Self::parse_line(line) {
            LineType::Question(text) => self.handle_question(text, line_num)?,
            LineType::Answer(text) => self.handle_answer(text, line_num)?,
            LineType::Text(text) => self.push_continuation(text),
            LineType::Empty => self.push_continuation(""),
        }
        Ok(())
    }

    fn parse_line(line: &str) -> LineType<'_> {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix("Q:") {
            LineType::Question(rest.trim())
        } else if let Some(rest) = trimmed.strip_prefix("A:") {
            LineType::Answer(rest.trim())
        } else if trimmed.is_empty() {
            LineType::Empty
        } else {
            LineType::Text(line)
        }
    }

    fn handle_question(&mut self, text: &str, line_num: usize) -> Result<()> {
        self.finish_card()?;
        self.current = Some(CardBuilder::new(line_num));
        self.current_field = Some(Field::Question);
        self.buffer.push(text.to_string());
        Ok(())
    }

    fn handle_answer(&mut self, text: &str, line_num: usize) -> Result<()> {
        self.flush_buffer();

        // An answer needs a question of its own
        match self.current {
            Some(ref card) if card.answer.is_none() => {}
            _ => return Err(DeckError::MissingQuestion { line: line_num }),
        }

        self.current_field = Some(Field::Answer);
        self.buffer.push(text.to_string());
        Ok(())
    }

    fn push_continuation(&mut self, text: &str) {
        if self.current_field.is_some() {
            self.buffer.push(text.to_string());
        }
    }

    fn flush_buffer(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let content = self.buffer.join("\n");
        self.buffer.clear();

        if let Some(ref mut card) = self.current {
            match self.current_field {
                Some(Field::Question) => card.question = Some(content),
                Some(Field::Answer) => card.answer = Some(content),
                None => {}
            }
        }
    }

    fn finish_card(&mut self) -> Result<()> {
        self.flush_buffer();
        self.current_field = None;

        if let Some(card) = self.current.take() {
            self.cards.push(card.build()?);
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<CardRecord>> {
        self.finish_card()?;
        Ok(self.cards)
    }
}

enum LineType<'a> {
    Question(&'a str),
    Answer(&'a str),
    Text(&'a str),
    Empty,
}
