//! Collaborator interfaces a frontend plugs into the engine, plus the stock
//! terminal implementations used by the binaries.
//!
//! The engine knows nothing about pixels on screen or input devices: a
//! `Renderer` draws whatever state it is handed, and an `InputTranslator`
//! turns raw device events into logical `Command`s.

use std::io::{self, Write};

use crate::engine::{Command, GamePhase, Grid, Move, Point};

/// Draws the current game state.
pub trait Renderer {
    fn render(&mut self, grid: Option<&Grid>, phase: GamePhase, score: u64) -> io::Result<()>;
}

/// Decodes raw input into a logical command. `None` means "not a command".
pub trait InputTranslator {
    type Raw: ?Sized;

    fn translate(&self, raw: &Self::Raw) -> Option<Command>;
}

/// Maps typed tokens (one per line in the terminal frontend) to commands.
///
/// ```
/// use slide_2048::engine::{Command, Move};
/// use slide_2048::frontend::{InputTranslator, KeyTranslator};
/// assert_eq!(KeyTranslator.translate("W"), Some(Command::Move(Move::Up)));
/// assert_eq!(KeyTranslator.translate(""), Some(Command::Start));
/// assert_eq!(KeyTranslator.translate("xyzzy"), None);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyTranslator;

impl InputTranslator for KeyTranslator {
    type Raw = str;

    fn translate(&self, raw: &str) -> Option<Command> {
        let token = raw.trim().to_ascii_lowercase();
        let command = match token.as_str() {
            "w" | "k" | "up" => Command::Move(Move::Up),
            "s" | "j" | "down" => Command::Move(Move::Down),
            "a" | "h" | "left" => Command::Move(Move::Left),
            "d" | "l" | "right" => Command::Move(Move::Right),
            "" | "enter" | "start" => Command::Start,
            "c" | "continue" => Command::Continue,
            "n" | "new" => Command::NewGame,
            "b" | "back" => Command::Back,
            "q" | "quit" | "exit" => Command::Quit,
            _ => return None,
        };
        Some(command)
    }
}

/// Maps a click on a square board surface to a command.
///
/// The surface is split into quarters on both axes: the middle half of the
/// top row of quarters is Up, of the bottom row Down, of the left column Left
/// and of the right column Right. Anything else (centre and corners) is Start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickTranslator {
    pub width: i32,
    pub height: i32,
}

impl ClickTranslator {
    pub fn new(width: i32, height: i32) -> Self {
        ClickTranslator { width, height }
    }
}

impl InputTranslator for ClickTranslator {
    type Raw = Point;

    fn translate(&self, click: &Point) -> Option<Command> {
        if click.x < 0 || click.y < 0 || click.x >= self.width || click.y >= self.height {
            return None;
        }
        let qw = self.width / 4;
        let qh = self.height / 4;
        let mid_x = click.x >= qw && click.x < self.width - qw;
        let mid_y = click.y >= qh && click.y < self.height - qh;
        let command = if mid_x && click.y < qh {
            Command::Move(Move::Up)
        } else if mid_x && click.y >= self.height - qh {
            Command::Move(Move::Down)
        } else if mid_y && click.x < qw {
            Command::Move(Move::Left)
        } else if mid_y && click.x >= self.width - qw {
            Command::Move(Move::Right)
        } else {
            Command::Start
        };
        Some(command)
    }
}

/// Plain-text renderer for terminals and logs.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        TextRenderer { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, grid: Option<&Grid>, phase: GamePhase, score: u64) -> io::Result<()> {
        let Some(grid) = grid else {
            writeln!(self.out, "\n            2048\n        TAP TO START\n")?;
            return self.out.flush();
        };
        writeln!(self.out, "\nScore: {score}")?;
        write!(self.out, "{grid}")?;
        match phase {
            GamePhase::Win => {
                writeln!(self.out, "You Win!  Score: {score}")?;
                writeln!(self.out, "[c] keep going   [n] back to title")?;
            }
            GamePhase::Lose => {
                writeln!(self.out, "Game Over  Score: {score}")?;
                writeln!(self.out, "[n] back to title")?;
            }
            GamePhase::Title | GamePhase::Game => {}
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Game, Layout};

    #[test]
    fn it_translates_keys_case_insensitively() {
        let t = KeyTranslator;
        assert_eq!(t.translate("  LEFT "), Some(Command::Move(Move::Left)));
        assert_eq!(t.translate("j"), Some(Command::Move(Move::Down)));
        assert_eq!(t.translate("l"), Some(Command::Move(Move::Right)));
        assert_eq!(t.translate("c"), Some(Command::Continue));
        assert_eq!(t.translate("n"), Some(Command::NewGame));
        assert_eq!(t.translate("back"), Some(Command::Back));
        assert_eq!(t.translate("q"), Some(Command::Quit));
        assert_eq!(t.translate("up up"), None);
    }

    #[test]
    fn it_translates_click_regions() {
        let extent = Layout::default().board_extent();
        let t = ClickTranslator::new(extent, extent);
        let mid = extent / 2;
        assert_eq!(t.translate(&Point::new(mid, 2)), Some(Command::Move(Move::Up)));
        assert_eq!(t.translate(&Point::new(mid, extent - 2)), Some(Command::Move(Move::Down)));
        assert_eq!(t.translate(&Point::new(2, mid)), Some(Command::Move(Move::Left)));
        assert_eq!(t.translate(&Point::new(extent - 2, mid)), Some(Command::Move(Move::Right)));
        assert_eq!(t.translate(&Point::new(mid, mid)), Some(Command::Start));
        assert_eq!(t.translate(&Point::new(1, 1)), Some(Command::Start));
        assert_eq!(t.translate(&Point::new(-1, mid)), None);
        assert_eq!(t.translate(&Point::new(mid, extent)), None);
    }

    #[test]
    fn it_renders_title_and_board() {
        let mut r = TextRenderer::new(Vec::new());
        r.render(None, GamePhase::Title, 0).unwrap();
        let text = String::from_utf8(r.into_inner()).unwrap();
        assert!(text.contains("TAP TO START"));

        let mut game = Game::seeded(8);
        game.start_new_game();
        let mut r = TextRenderer::new(Vec::new());
        r.render(game.grid(), game.phase(), game.score()).unwrap();
        let text = String::from_utf8(r.into_inner()).unwrap();
        assert!(text.contains("Score: 0"));
        assert!(!text.contains("Game Over"));
    }

    #[test]
    fn it_renders_end_summary() {
        let mut r = TextRenderer::new(Vec::new());
        r.render(Some(&Grid::new()), GamePhase::Lose, 1234).unwrap();
        let text = String::from_utf8(r.into_inner()).unwrap();
        assert!(text.contains("Game Over  Score: 1234"));
        assert!(text.contains("[n] back to title"));
    }
}
