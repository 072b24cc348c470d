use std::fmt;

const WIN_SEQUENCES: [[usize; 3]; 8] = [
    // Horizontal
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Vertical
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonal
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Player {
    First,
    Second,
}

impl Player {
    pub fn swap(&self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    pub fn mark(&self) -> char {
        match self {
            Player::First => 'o',
            Player::Second => 'x',
        }
    }
}

/// A single square. Squares only ever move forward:
/// `Empty -> Marked -> Highlight`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Square {
    Empty,
    Marked(Player),
    Highlight,
}

impl Square {
    pub fn is_empty(&self) -> bool {
        matches!(self, Square::Empty)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    side: usize,
    squares: Vec<Square>,
}

impl Board {
    /// Returns `None` when `side * side` overflows.
    pub fn new(side: usize) -> Option<Self> {
        let len = side.checked_mul(side)?;
        let squares = vec![Square::Empty; len];
        Some(Self { side, squares })
    }

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn get(&self, index: usize) -> Option<Square> {
        self.squares.get(index).copied()
    }

    /// Places `player`'s mark. Returns false and leaves the board untouched
    /// if the square is missing or already set.
    pub fn mark(&mut self, index: usize, player: Player) -> bool {
        match self.squares.get_mut(index) {
            Some(square) if square.is_empty() => {
                *square = Square::Marked(player);
                true
            }
            _ => false,
        }
    }

    pub fn is_valid_move(&self, index: usize) -> bool {
        self.get(index).is_some_and(|square| square.is_empty())
    }

    pub fn empty_squares(&self) -> Vec<usize> {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, square)| square.is_empty())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn free_cells(&self) -> usize {
        self.squares.iter().filter(|square| square.is_empty()).count()
    }

    pub fn has_highlight(&self) -> bool {
        self.squares.contains(&Square::Highlight)
    }

    /// First sequence (rows, then columns, then diagonals) fully held by
    /// `player`. Only the 3x3 layout is scanned; sequences reaching past the
    /// end of a smaller board never match.
    pub fn winning_line(&self, player: Player) -> Option<[usize; 3]> {
        let mark = Some(Square::Marked(player));
        WIN_SEQUENCES
            .into_iter()
            .find(|seq| seq.iter().all(|i| self.get(*i) == mark))
    }

    pub fn highlight(&mut self, line: [usize; 3]) {
        for index in line {
            if let Some(square) = self.squares.get_mut(index) {
                *square = Square::Highlight;
            }
        }
    }

    fn display_square(index: usize, square: Square) -> String {
        match square {
            Square::Empty => index.to_string(),
            Square::Marked(player) => player.mark().to_string(),
            Square::Highlight => "*".to_string(),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.squares.chunks(self.side.max(1)).enumerate();
        for (row, squares) in rows {
            if row > 0 {
                f.write_str("------------------\n")?;
            }
            let cells: Vec<String> = squares
                .iter()
                .enumerate()
                .map(|(col, square)| Self::display_square(row * self.side + col, *square))
                .map(|cell| format!("  {}  ", cell))
                .collect();
            writeln!(f, "{}", cells.join("|").trim_end())?;
        }
        Ok(())
    }
}
